//! Todo operations, always scoped to the calling user
//!
//! A todo that exists but belongs to someone else is reported exactly like a todo
//! that does not exist.

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{ApiError, ApiResult},
    model::Todo,
    schema::{CreateTodoSchema, UpdateTodoSchema},
    store::TodoStore,
};

const NOT_FOUND: &str = "Todo not found or you are not authorized";

#[derive(Clone)]
pub struct TodoService {
    store: TodoStore,
}

impl TodoService {
    pub fn new(store: TodoStore) -> Self {
        Self { store }
    }

    /// Parse a path id. An id that can't be parsed can't name a todo either.
    pub fn parse_id(raw: &str) -> ApiResult<Uuid> {
        Uuid::parse_str(raw).map_err(|_| not_found())
    }

    pub async fn list(&self, user_id: Uuid) -> ApiResult<Vec<Todo>> {
        Ok(self.store.list_for_owner(user_id).await?)
    }

    pub async fn get(&self, user_id: Uuid, todo_id: Uuid) -> ApiResult<Todo> {
        self.store
            .find_owned(todo_id, user_id)
            .await?
            .ok_or_else(not_found)
    }

    pub async fn create(&self, user_id: Uuid, schema: CreateTodoSchema) -> ApiResult<Todo> {
        let schema = schema.normalized();
        schema.validate()?;

        let (Some(title), Some(description)) = (schema.title, schema.description) else {
            return Err(ApiError::Validation(
                "Title and description are required".to_string(),
            ));
        };

        let todo = self.store.insert(user_id, &title, &description).await?;
        tracing::debug!(todo_id = %todo.id, user_id = %user_id, "Todo created");
        Ok(todo)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        todo_id: Uuid,
        schema: UpdateTodoSchema,
    ) -> ApiResult<Todo> {
        let schema = schema.normalized();
        schema.validate()?;

        if schema.is_empty() {
            return self.get(user_id, todo_id).await;
        }

        self.store
            .update_owned(
                todo_id,
                user_id,
                schema.title.as_deref(),
                schema.description.as_deref(),
            )
            .await?
            .ok_or_else(not_found)
    }

    pub async fn toggle(&self, user_id: Uuid, todo_id: Uuid) -> ApiResult<Todo> {
        self.store
            .toggle_owned(todo_id, user_id)
            .await?
            .ok_or_else(not_found)
    }

    pub async fn delete(&self, user_id: Uuid, todo_id: Uuid) -> ApiResult<Todo> {
        let todo = self
            .store
            .delete_owned(todo_id, user_id)
            .await?
            .ok_or_else(not_found)?;
        tracing::debug!(todo_id = %todo.id, user_id = %user_id, "Todo deleted");
        Ok(todo)
    }
}

fn not_found() -> ApiError {
    ApiError::NotFound(NOT_FOUND.to_string())
}
