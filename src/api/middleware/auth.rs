//! JWT authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::Identity;
use crate::errors::AppError;

/// JWT authentication middleware.
///
/// Validates the bearer token from the Authorization header and injects the
/// caller's `Identity` into the request extensions. Role checks happen in
/// the inventory service.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request).ok_or(AppError::Unauthorized)?;

    let identity = Identity::from(state.auth_service.verify_token(token)?);
    tracing::debug!(account_id = identity.id, role = %identity.role, "Request authenticated");

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
