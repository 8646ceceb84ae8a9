//! Authentication middleware: Bearer token extraction and JWT verification.

use axum::http::header::AUTHORIZATION;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use gatehouse_core::auth::UNAUTHENTICATED_MESSAGE;
use gatehouse_core::models::auth::TokenClaims;
use tracing::debug;

use crate::AppState;
use crate::error::AppError;

/// Validated claims stored in request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount(pub TokenClaims);

/// Axum middleware: extracts `Authorization: Bearer <token>`, validates it and
/// injects `AuthenticatedAccount` into request extensions.
///
/// Every rejection carries the same body regardless of the reason.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(header) = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    else {
        debug!(reason = "missing_header", "request unauthenticated");
        return Err(AppError::Unauthorized(UNAUTHENTICATED_MESSAGE.into()));
    };

    let Some(token) = header.strip_prefix("Bearer ") else {
        debug!(reason = "wrong_scheme", "request unauthenticated");
        return Err(AppError::Unauthorized(UNAUTHENTICATED_MESSAGE.into()));
    };

    let claims = state.auth.validate_token(token.trim())?;

    request.extensions_mut().insert(AuthenticatedAccount(claims));

    Ok(next.run(request).await)
}
