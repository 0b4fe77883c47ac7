//! Auth API handlers

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::auth::verify_password;
use crate::core::AppState;
use crate::db::repository::admin;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
}

/// POST /auth/login - exchange credentials for a bearer token.
///
/// Unknown usernames and wrong passwords produce the same response, so the
/// endpoint does not reveal which accounts exist.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let admin = admin::find_by_username(&state.pool, &payload.username)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid username or password"))?;

    if !verify_password(&payload.password, &admin.password_hash) {
        return Err(AppError::unauthorized("Invalid username or password"));
    }

    let token = state
        .jwt
        .generate_token(admin.id, &admin.username)
        .map_err(AppError::from)?;

    tracing::info!(username = %admin.username, "Admin logged in");

    Ok(Json(LoginResponse {
        token,
        username: admin.username,
    }))
}
