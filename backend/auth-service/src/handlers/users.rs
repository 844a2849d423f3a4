/// Handlers for the caller's own account
use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::Result,
    models::{AccountProfile, AuthenticatedAccount, UpdateProfileRequest},
    AppState,
};

/// GET /api/v1/auth/users/me
pub async fn get_me(
    State(state): State<AppState>,
    caller: AuthenticatedAccount,
) -> Result<Json<AccountProfile>> {
    let profile = state.auth.get_profile(&caller).await?;
    Ok(Json(profile))
}

/// PUT /api/v1/auth/users/me
pub async fn update_me(
    State(state): State<AppState>,
    caller: AuthenticatedAccount,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<AccountProfile>> {
    let profile = state
        .auth
        .update_profile(&caller, &req.name, &req.email)
        .await?;
    Ok(Json(profile))
}

/// DELETE /api/v1/auth/users/me
pub async fn delete_me(
    State(state): State<AppState>,
    caller: AuthenticatedAccount,
) -> Result<StatusCode> {
    state.auth.delete_account(&caller).await?;
    Ok(StatusCode::NO_CONTENT)
}
