use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::warn;
use uuid::Uuid;

use super::AppState;
use crate::error::ApiError;

/// Bearer token authentication. On success the caller's `User` is attached to
/// the request extensions for handlers.
pub(super) async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok());

    let Some(header_value) = auth_header else {
        warn!("Missing Authorization header");
        return Err(ApiError::Unauthorized);
    };

    let token = header_value.strip_prefix("Bearer ").ok_or_else(|| {
        warn!("Invalid Authorization header format");
        ApiError::Unauthorized
    })?;

    let uuid_token = Uuid::parse_str(token).map_err(|_| {
        warn!("Invalid UUID token format");
        ApiError::Unauthorized
    })?;

    match state.users.authenticate(uuid_token) {
        Some(user) => {
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        None => {
            warn!(token = %uuid_token, "Unauthorized access attempt");
            Err(ApiError::Unauthorized)
        }
    }
}
