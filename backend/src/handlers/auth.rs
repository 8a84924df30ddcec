//! HTTP handlers for authentication endpoints

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::{require_admin, CurrentUser};
use crate::services::auth::{AuthService, AuthTokens, RegisterUserInput};
use crate::AppState;
use shared::models::User;
use shared::types::ApiResponse;

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshInput {
    pub refresh_token: String,
}

/// Authenticate with username and password
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> AppResult<Json<ApiResponse<AuthTokens>>> {
    let service = AuthService::new(state.db.clone(), &state.config);
    let tokens = service.login(&input.username, &input.password).await?;
    Ok(Json(ApiResponse::success(tokens)))
}

/// Exchange a refresh token for new tokens
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshInput>,
) -> AppResult<Json<ApiResponse<AuthTokens>>> {
    let service = AuthService::new(state.db.clone(), &state.config);
    let tokens = service.refresh_token(&input.refresh_token).await?;
    Ok(Json(ApiResponse::success(tokens)))
}

/// Register a new user account (admin only)
pub async fn register(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<RegisterUserInput>,
) -> AppResult<Json<ApiResponse<User>>> {
    require_admin(&current_user.0)?;
    let service = AuthService::new(state.db.clone(), &state.config);
    let user = service.register(input).await?;
    Ok(Json(ApiResponse::success(user)))
}

/// Current user's account
pub async fn me(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<ApiResponse<User>>> {
    let service = AuthService::new(state.db.clone(), &state.config);
    let user = service.get_user(current_user.0.user_id).await?;
    Ok(Json(ApiResponse::success(user)))
}
