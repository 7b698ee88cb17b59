//! Registration and login
//!
//! Passwords are hashed with bcrypt on the blocking pool. Successful calls mint a
//! session token; there is no server-side session to create or destroy.

use std::sync::Arc;

use tokio::sync::OnceCell;
use validator::Validate;

use crate::{
    error::{ApiError, ApiResult},
    model::UserProfile,
    schema::{LoginSchema, RegisterSchema},
    store::UserStore,
    token::TokenCodec,
};

const DUPLICATE_EMAIL: &str = "User already exists";

// Hashed once per service to give unknown emails the same bcrypt cost as real ones.
const DUMMY_PASSWORD: &str = "not-a-real-password";

/// A user who has just registered or logged in, with their fresh session token
#[derive(Debug)]
pub struct Session {
    pub user: UserProfile,
    pub token: String,
}

#[derive(Clone)]
pub struct AuthService {
    users: UserStore,
    tokens: TokenCodec,
    bcrypt_cost: u32,
    dummy_hash: Arc<OnceCell<String>>,
}

impl AuthService {
    pub fn new(users: UserStore, tokens: TokenCodec, bcrypt_cost: u32) -> Self {
        Self {
            users,
            tokens,
            bcrypt_cost,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    pub async fn register(&self, schema: RegisterSchema) -> ApiResult<Session> {
        let schema = schema.normalized();
        schema.validate()?;

        let (name, email, password) = match (schema.name, schema.email, schema.password) {
            (Some(name), Some(email), Some(password)) => (name, email, password),
            _ => {
                return Err(ApiError::Validation(
                    "Name, email and password are required".to_string(),
                ))
            }
        };

        if self.users.email_exists(&email).await? {
            return Err(ApiError::Validation(DUPLICATE_EMAIL.to_string()));
        }

        let cost = self.bcrypt_cost;
        let password_hash =
            tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;

        // A concurrent registration can still win the race; the UNIQUE index catches it.
        let user = self
            .users
            .insert(&name, &email, &password_hash)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    ApiError::Validation(DUPLICATE_EMAIL.to_string())
                }
                other => ApiError::from(other),
            })?;

        tracing::info!(user_id = %user.id, "User registered");

        self.session_for(UserProfile::from(&user))
    }

    pub async fn login(&self, schema: LoginSchema) -> ApiResult<Session> {
        let email = schema.email.unwrap_or_default().trim().to_lowercase();
        let password = schema.password.unwrap_or_default();
        if email.is_empty() || password.is_empty() {
            return Err(ApiError::Authentication);
        }

        let Some(user) = self.users.find_by_email(&email).await? else {
            // Pay for a full bcrypt check so response time doesn't reveal registered emails.
            let hash = self.dummy_hash().await?;
            verify_password(password, hash).await?;
            tracing::warn!("Login failed: unknown email");
            return Err(ApiError::Authentication);
        };

        if !verify_password(password, user.password_hash.clone()).await? {
            tracing::warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(ApiError::Authentication);
        }

        tracing::info!(user_id = %user.id, "User logged in");

        self.session_for(UserProfile::from(&user))
    }

    async fn dummy_hash(&self) -> ApiResult<String> {
        let cost = self.bcrypt_cost;
        let hash = self
            .dummy_hash
            .get_or_try_init(|| async move {
                let hash =
                    tokio::task::spawn_blocking(move || bcrypt::hash(DUMMY_PASSWORD, cost))
                        .await??;
                Ok::<_, ApiError>(hash)
            })
            .await?;
        Ok(hash.clone())
    }

    fn session_for(&self, user: UserProfile) -> ApiResult<Session> {
        let token = self
            .tokens
            .issue(user.id)
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        Ok(Session { user, token })
    }
}

async fn verify_password(password: String, hash: String) -> ApiResult<bool> {
    Ok(tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??)
}
