use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use super::{error::ApiError, state::AppState, utils::bearer_token};

/// Guards admin routes when a token is configured.
pub async fn require_admin_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = state.config.admin.token.as_deref() else {
        return Ok(next.run(request).await);
    };

    let provided = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token);

    if provided == Some(expected) {
        return Ok(next.run(request).await);
    }

    warn!(path = %request.uri().path(), "Rejected admin request");
    Err(ApiError::Unauthorized)
}
