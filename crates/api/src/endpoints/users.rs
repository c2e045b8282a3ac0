//! User endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
};
use serde::{Deserialize, Serialize};
use shutter_common::AppResult;
use shutter_core::UserProfile;
use shutter_db::entities::user;
use tracing::info;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
}

/// Rename request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetUsernameRequest {
    pub new_username: String,
}

/// User response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user_id: String,
    pub username: String,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            user_id: u.user_id,
            username: u.username,
        }
    }
}

/// Username response.
#[derive(Debug, Serialize)]
pub struct UsernameResponse {
    pub username: String,
}

/// List users visible to the caller.
async fn list_users(
    AuthUser(me): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    let users = state.visibility_service.list_users(&me.user_id).await?;
    Ok(ApiResponse::ok(users.into_iter().map(Into::into).collect()))
}

/// Register a user explicitly.
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<(StatusCode, ApiResponse<UserResponse>)> {
    let user = state.user_service.register(&req.username).await?;
    info!(user_id = %user.user_id, username = %user.username, "User registered");
    Ok(ApiResponse::created(user.into()))
}

/// Profile by id.
async fn show_user(
    AuthUser(_me): AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<UserProfile>> {
    let profile = state.user_service.get_profile_by_id(&user_id).await?;
    Ok(ApiResponse::ok(profile))
}

/// Profile by username.
async fn show_profile(
    AuthUser(_me): AuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<ApiResponse<UserProfile>> {
    let profile = state.user_service.get_profile_by_username(&username).await?;
    Ok(ApiResponse::ok(profile))
}

/// Current username of a user.
async fn get_username(
    AuthUser(_me): AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<UsernameResponse>> {
    let username = state.user_service.get_username(&user_id).await?;
    Ok(ApiResponse::ok(UsernameResponse { username }))
}

/// Rename the caller.
async fn set_username(
    AuthUser(me): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SetUsernameRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state
        .user_service
        .set_username(&me.user_id, &req.new_username)
        .await?;
    info!(user_id = %user.user_id, from = %me.username, to = %user.username, "Username changed");
    Ok(ApiResponse::ok(user.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(register))
        .route("/users/username", patch(set_username))
        .route("/users/{user_id}", get(show_user))
        .route("/users/{user_id}/username", get(get_username))
        .route("/profiles/{username}", get(show_profile))
}
