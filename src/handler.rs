use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    CookieJar, WithRejection,
};
use serde_json::json;

use crate::{
    config::Config,
    db,
    error::{ApiError, ApiResult},
    model::CurrentUser,
    schema::{CreateTodoSchema, LoginSchema, RegisterSchema, UpdateTodoSchema},
    service::{Session, TodoService},
    AppState, TOKEN_COOKIE,
};

type JsonBody<T> = WithRejection<Json<T>, ApiError>;

// Handler for the health checker route
pub async fn health_checker_handler(
    State(data): State<Arc<AppState>>,
) -> ApiResult<impl IntoResponse> {
    const MESSAGE: &str = "Todo API with Rust, SQLX, SQLite, and Axum";

    db::check_health(&data.db).await?;

    Ok(Json(json!({
        "status": "success",
        "message": MESSAGE
    })))
}

// Handler for registering a new user
pub async fn register(
    State(data): State<Arc<AppState>>,
    jar: CookieJar,
    WithRejection(Json(body), _): JsonBody<RegisterSchema>,
) -> ApiResult<impl IntoResponse> {
    let session = data.auth.register(body).await?;
    let jar = jar.add(session_cookie(&session, &data.config));

    Ok((
        StatusCode::CREATED,
        jar,
        Json(json!({
            "message": "User registered successfully",
            "user": session.user
        })),
    ))
}

// Handler for logging in
pub async fn login(
    State(data): State<Arc<AppState>>,
    jar: CookieJar,
    WithRejection(Json(body), _): JsonBody<LoginSchema>,
) -> ApiResult<impl IntoResponse> {
    let session = data.auth.login(body).await?;
    let jar = jar.add(session_cookie(&session, &data.config));

    Ok((
        StatusCode::OK,
        jar,
        Json(json!({
            "message": "Login successful",
            "user": session.user
        })),
    ))
}

// Handler for logging out. Tokens are stateless, so this only expires the cookie.
pub async fn logout(State(data): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    let mut cookie = base_cookie(String::new(), &data.config);
    cookie.make_removal();
    tracing::info!("User logged out");

    (
        jar.add(cookie),
        Json(json!({ "message": "Logged out successfully" })),
    )
}

// Handler for getting all Todo items of the current user
pub async fn get_todos(
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<impl IntoResponse> {
    let todos = data.todos.list(user.user_id).await?;

    Ok(Json(json!({
        "count": todos.len(),
        "todos": todos
    })))
}

// Handler for getting a specific Todo by ID
pub async fn get_todo(
    Path(id): Path<String>,
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<impl IntoResponse> {
    let todo = data
        .todos
        .get(user.user_id, TodoService::parse_id(&id)?)
        .await?;

    Ok(Json(todo))
}

// Handler for creating a new Todo
pub async fn create_todo(
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    WithRejection(Json(body), _): JsonBody<CreateTodoSchema>,
) -> ApiResult<impl IntoResponse> {
    let todo = data.todos.create(user.user_id, body).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Todo created successfully",
            "todo": todo
        })),
    ))
}

// Handler for updating the title and/or description of a Todo
pub async fn update_todo(
    Path(id): Path<String>,
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    WithRejection(Json(body), _): JsonBody<UpdateTodoSchema>,
) -> ApiResult<impl IntoResponse> {
    let todo = data
        .todos
        .update(user.user_id, TodoService::parse_id(&id)?, body)
        .await?;

    Ok(Json(json!({
        "message": "Todo updated successfully",
        "todo": todo
    })))
}

// Handler for flipping the completed flag of a Todo
pub async fn toggle_todo(
    Path(id): Path<String>,
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<impl IntoResponse> {
    let todo = data
        .todos
        .toggle(user.user_id, TodoService::parse_id(&id)?)
        .await?;

    Ok(Json(json!({
        "message": "Todo status toggled successfully",
        "todo": todo
    })))
}

// Handler for deleting a Todo by ID
pub async fn delete_todo(
    Path(id): Path<String>,
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<impl IntoResponse> {
    let deleted = data
        .todos
        .delete(user.user_id, TodoService::parse_id(&id)?)
        .await?;

    Ok(Json(json!({
        "message": "Todo deleted successfully",
        "deletedTodo": deleted
    })))
}

fn session_cookie(session: &Session, config: &Config) -> Cookie<'static> {
    let mut cookie = base_cookie(session.token.clone(), config);
    cookie.set_max_age(time::Duration::hours(config.token_ttl_hours));
    cookie
}

fn base_cookie(value: String, config: &Config) -> Cookie<'static> {
    let same_site = if config.cookie_secure {
        SameSite::None
    } else {
        SameSite::Lax
    };

    Cookie::build(TOKEN_COOKIE, value)
        .path("/")
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(same_site)
        .finish()
}
