use chrono::Utc;
use sqlx::{query_as, Pool, Sqlite};
use uuid::Uuid;

use crate::model::User;

/// Credential store. Emails are stored exactly as given; callers normalize them.
#[derive(Clone)]
pub struct UserStore {
    db: Pool<Sqlite>,
}

impl UserStore {
    pub fn new(db: Pool<Sqlite>) -> Self {
        Self { db }
    }

    pub async fn insert(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        query_as::<_, User>(
            "INSERT INTO users (id, name, email, password_hash, created_at) VALUES (?, ?, ?, ?, ?) \
             RETURNING id, name, email, password_hash, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(&self.db)
        .await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        query_as::<_, User>(
            "SELECT id, name, email, password_hash, created_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, sqlx::Error> {
        let (count,): (i64,) = query_as("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.db)
            .await?;
        Ok(count > 0)
    }
}
