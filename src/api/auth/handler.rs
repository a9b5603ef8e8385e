//! Authentication handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{LoginRequest, LoginResponse, RegisterRequest, User};
use crate::utils::{AppResponse, AppResult, ok, ok_with_message};

/// Authenticate and hand out a token.
///
/// Every failure answers 401; bad email and bad password are not
/// distinguishable from the outside.
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AppResponse<LoginResponse>>> {
    payload.validate()?;
    let response = state.auth.login(&payload).await?;
    Ok(ok(response))
}

/// Self-registration. The account starts pending and cannot log in
/// until approved.
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AppResponse<User>>)> {
    payload.validate()?;
    let user = state.auth.register(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(AppResponse::success_with_message(
            user,
            "Account created, awaiting approval",
        )),
    ))
}

/// Accounts waiting for approval.
pub async fn pending_users(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<User>>>> {
    let users = state.auth.pending_users().await?;
    Ok(ok(users))
}

/// Approve a pending account.
pub async fn approve_user(
    State(state): State<ServerState>,
    admin: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<User>>> {
    let user = state.auth.approve(admin.id, id).await?;
    Ok(ok_with_message(user, "Account approved"))
}

/// Reject (and delete) a pending account.
pub async fn reject_user(
    State(state): State<ServerState>,
    admin: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<()>>> {
    state.auth.reject(admin.id, id).await?;
    Ok(Json(AppResponse::message("Account rejected")))
}
