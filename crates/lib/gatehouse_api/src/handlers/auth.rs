//! Authentication request handlers.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::{Extension, Json};
use gatehouse_core::models::account::PublicAccount;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedAccount;
use crate::models::{LoginRequest, LoginResponse};

/// `POST /api/auth/login`: authenticate with email + password.
pub async fn login_handler(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<LoginResponse>> {
    let Json(body) = body?;
    body.validate(state.auth.store().min_password_length())?;

    let outcome = state.auth.login(&body.email, &body.password).await?;
    Ok(Json(LoginResponse {
        token: outcome.token,
        token_type: "Bearer".to_string(),
        expires_in: state.auth.keys().lifetime().num_seconds(),
        account: outcome.account,
    }))
}

/// `GET /api/auth/me`: the account the bearer token was issued for.
pub async fn me_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedAccount(claims)): Extension<AuthenticatedAccount>,
) -> AppResult<Json<PublicAccount>> {
    let account = state.auth.account_for_claims(&claims).await?;
    Ok(Json(account))
}
