use std::sync::Arc;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    middleware::from_fn_with_state,
    routing::{get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{handler::*, middleware::mw_require_auth, AppState};

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(app_state.config.cors_origin.clone())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_credentials(true)
        .allow_headers([CONTENT_TYPE]);

    let todo_routes = Router::new()
        .route("/todos", get(get_todos).post(create_todo))
        .route(
            "/todos/:id",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .route("/todos/:id/toggle", patch(toggle_todo))
        .route_layer(from_fn_with_state(app_state.clone(), mw_require_auth));

    Router::new()
        .merge(todo_routes)
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/", get(health_checker_handler))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
