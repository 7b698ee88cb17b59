//! Persistence for users and todos

mod todos;
mod users;

pub use todos::TodoStore;
pub use users::UserStore;
