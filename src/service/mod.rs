mod auth;
mod todo;

pub use auth::{AuthService, Session};
pub use todo::TodoService;
