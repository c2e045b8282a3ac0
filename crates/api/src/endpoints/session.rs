//! Session and liveness endpoints.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use shutter_common::AppResult;
use tracing::info;

use crate::{middleware::AppState, response::ApiResponse};

/// Login request.
#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    pub name: String,
}

/// Login response. The token is sent back as `Authorization: Bearer <token>`.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
}

/// Log in, registering the user on first use.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<SessionRequest>,
) -> AppResult<(StatusCode, ApiResponse<SessionResponse>)> {
    let (user, created) = state.user_service.login(&req.name).await?;

    let status = if created {
        info!(user_id = %user.user_id, username = %user.username, "User registered on first login");
        StatusCode::CREATED
    } else {
        info!(user_id = %user.user_id, "User logged in");
        StatusCode::OK
    };

    Ok((
        status,
        ApiResponse::ok(SessionResponse {
            token: user.user_id,
        }),
    ))
}

/// Liveness probe.
async fn liveness() -> StatusCode {
    StatusCode::OK
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/session", post(login))
        .route("/liveness", get(liveness))
}
