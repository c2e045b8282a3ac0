//! Ban endpoints.

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use shutter_common::AppResult;
use shutter_db::entities::ban;
use tracing::info;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, no_content},
};

/// Ban response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BanResponse {
    pub ban_id: String,
    pub banned_user: String,
    pub timestamp: DateTime<Utc>,
}

impl From<ban::Model> for BanResponse {
    fn from(b: ban::Model) -> Self {
        Self {
            ban_id: b.ban_id,
            banned_user: b.banned_user,
            timestamp: b.timestamp,
        }
    }
}

/// Ban state response.
#[derive(Debug, Serialize)]
pub struct BannedResponse {
    pub banned: bool,
}

/// Whether the caller bans a user.
async fn ban_exists(
    AuthUser(me): AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<BannedResponse>> {
    let banned = state.ban_service.ban_exists(&me.user_id, &user_id).await?;
    Ok(ApiResponse::ok(BannedResponse { banned }))
}

/// Ban a user.
async fn ban_user(
    AuthUser(me): AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<(StatusCode, ApiResponse<BanResponse>)> {
    let ban = state.ban_service.ban(&me.user_id, &user_id).await?;
    info!(banned_by = %me.user_id, banned_user = %user_id, "User banned");
    Ok(ApiResponse::created(ban.into()))
}

/// Lift a ban.
async fn unban_user(
    AuthUser(me): AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.ban_service.unban(&me.user_id, &user_id).await?;
    info!(banned_by = %me.user_id, banned_user = %user_id, "User unbanned");
    Ok(no_content())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/bans/{user_id}", get(ban_exists))
        .route("/users/{user_id}/bans", post(ban_user).delete(unban_user))
}
