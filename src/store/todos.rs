use chrono::Utc;
use sqlx::{query_as, Pool, Sqlite};
use uuid::Uuid;

use crate::model::Todo;

const COLUMNS: &str = "id, title, description, completed, user_id, created_at, updated_at";

/// Todo store. Every statement that touches an existing row matches on
/// `id AND user_id`, and each mutation is a single statement.
#[derive(Clone)]
pub struct TodoStore {
    db: Pool<Sqlite>,
}

impl TodoStore {
    pub fn new(db: Pool<Sqlite>) -> Self {
        Self { db }
    }

    /// All todos of `owner`, newest first
    pub async fn list_for_owner(&self, owner: Uuid) -> Result<Vec<Todo>, sqlx::Error> {
        query_as::<_, Todo>(&format!(
            "SELECT {COLUMNS} FROM todos WHERE user_id = ? ORDER BY created_at DESC, rowid DESC"
        ))
        .bind(owner)
        .fetch_all(&self.db)
        .await
    }

    pub async fn find_owned(&self, id: Uuid, owner: Uuid) -> Result<Option<Todo>, sqlx::Error> {
        query_as::<_, Todo>(&format!(
            "SELECT {COLUMNS} FROM todos WHERE id = ? AND user_id = ?"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await
    }

    pub async fn insert(
        &self,
        owner: Uuid,
        title: &str,
        description: &str,
    ) -> Result<Todo, sqlx::Error> {
        let now = Utc::now();
        query_as::<_, Todo>(&format!(
            "INSERT INTO todos (id, user_id, title, description, completed, created_at, updated_at) \
             VALUES (?, ?, ?, ?, 0, ?, ?) RETURNING {COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(title)
        .bind(description)
        .bind(now)
        .bind(now)
        .fetch_one(&self.db)
        .await
    }

    /// Overwrite only the fields that are `Some`
    pub async fn update_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<Option<Todo>, sqlx::Error> {
        query_as::<_, Todo>(&format!(
            "UPDATE todos SET title = COALESCE(?, title), description = COALESCE(?, description), \
             updated_at = ? WHERE id = ? AND user_id = ? RETURNING {COLUMNS}"
        ))
        .bind(title)
        .bind(description)
        .bind(Utc::now())
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await
    }

    pub async fn toggle_owned(&self, id: Uuid, owner: Uuid) -> Result<Option<Todo>, sqlx::Error> {
        query_as::<_, Todo>(&format!(
            "UPDATE todos SET completed = NOT completed, updated_at = ? \
             WHERE id = ? AND user_id = ? RETURNING {COLUMNS}"
        ))
        .bind(Utc::now())
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await
    }

    /// Delete and hand back the removed row
    pub async fn delete_owned(&self, id: Uuid, owner: Uuid) -> Result<Option<Todo>, sqlx::Error> {
        query_as::<_, Todo>(&format!(
            "DELETE FROM todos WHERE id = ? AND user_id = ? RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await
    }
}
