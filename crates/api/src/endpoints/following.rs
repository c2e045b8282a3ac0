//! Following endpoints.

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Serialize;
use shutter_common::AppResult;
use tracing::info;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, no_content},
};

/// Follow state response.
#[derive(Debug, Serialize)]
pub struct FollowedResponse {
    pub followed: bool,
}

/// Whether the caller follows a user.
async fn is_followed(
    AuthUser(me): AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<FollowedResponse>> {
    let followed = state
        .following_service
        .is_followed(&user_id, &me.user_id)
        .await?;
    Ok(ApiResponse::ok(FollowedResponse { followed }))
}

/// Follow a user.
async fn follow(
    AuthUser(me): AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<StatusCode> {
    state.following_service.follow(&me.user_id, &user_id).await?;
    info!(follower = %me.user_id, followed = %user_id, "User followed");
    Ok(StatusCode::CREATED)
}

/// Unfollow a user.
async fn unfollow(
    AuthUser(me): AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state
        .following_service
        .unfollow(&me.user_id, &user_id)
        .await?;
    info!(follower = %me.user_id, followed = %user_id, "User unfollowed");
    Ok(no_content())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/follows/{user_id}", get(is_followed))
        .route("/users/{user_id}/follows", post(follow).delete(unfollow))
}
