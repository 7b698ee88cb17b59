//! Personal todo list API
//!
//! Users register and log in, receive a signed session token in an HTTP-only
//! cookie, and manage todos that only they can see.

use sqlx::{Pool, Sqlite};

pub mod config;
pub mod db;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod model;
pub mod route;
pub mod schema;
pub mod service;
pub mod store;
pub mod token;

use config::Config;
use service::{AuthService, TodoService};
use store::{TodoStore, UserStore};
use token::TokenCodec;

/// Name of the cookie carrying the session token
pub const TOKEN_COOKIE: &str = "token";

// Struct representing the application state
pub struct AppState {
    pub db: Pool<Sqlite>,
    pub config: Config,
    pub tokens: TokenCodec,
    pub auth: AuthService,
    pub todos: TodoService,
}

impl AppState {
    pub fn new(db: Pool<Sqlite>, config: Config) -> Self {
        let tokens = TokenCodec::from_config(&config);
        Self {
            auth: AuthService::new(UserStore::new(db.clone()), tokens.clone(), config.bcrypt_cost),
            todos: TodoService::new(TodoStore::new(db.clone())),
            tokens,
            db,
            config,
        }
    }
}
