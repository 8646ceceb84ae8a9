//! Account handlers. Every route here sits behind `require_auth`.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use gatehouse_core::models::account::{NewAccount, PublicAccount, Role};
use gatehouse_core::uuid::parse_account_id;
use tracing::warn;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedAccount;
use crate::models::CreateAccountRequest;

/// `POST /api/accounts`: create an account. Superadmins only.
pub async fn create_account_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedAccount(caller)): Extension<AuthenticatedAccount>,
    body: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<PublicAccount>)> {
    if caller.role != Role::Superadmin {
        warn!(account_id = %caller.account_id, role = %caller.role, "account creation forbidden");
        return Err(AppError::Forbidden(
            "only superadmins may create accounts".into(),
        ));
    }

    let Json(body) = body?;

    let account = state
        .auth
        .create_account(NewAccount::new(
            body.name,
            body.email,
            body.password,
            body.role,
        ))
        .await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// `GET /api/accounts/{id}`: fetch one account by id.
pub async fn get_account_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<PublicAccount>> {
    let id = parse_account_id(&id).ok_or_else(|| AppError::NotFound("account not found".into()))?;
    let account = state.auth.store().find_by_id(id).await?;
    Ok(Json(account.into()))
}
