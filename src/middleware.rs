use std::sync::Arc;

use axum::{
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::{error::ApiError, model::CurrentUser, AppState, TOKEN_COOKIE};

// Resolves the session cookie to a user, or rejects the request with 401.
// Ownership of individual todos is checked further down, in the todo service.
pub async fn mw_require_auth<B>(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request<B>,
    next: Next<B>,
) -> Result<Response, ApiError> {
    let token = match jar.get(TOKEN_COOKIE) {
        Some(cookie) if !cookie.value().is_empty() => cookie.value().to_string(),
        _ => {
            return Err(ApiError::Unauthorized(
                "Not authorized. Token missing.".to_string(),
            ))
        }
    };

    match state.tokens.verify(&token) {
        Ok(user_id) => {
            request.extensions_mut().insert(CurrentUser { user_id });
        }
        Err(e) => {
            tracing::debug!(error = %e, "Rejected session token");
            return Err(ApiError::Unauthorized(
                "Invalid or expired token".to_string(),
            ));
        }
    }

    Ok(next.run(request).await)
}
