//! Comment endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shutter_common::AppResult;
use shutter_core::CommentView;
use shutter_db::entities::comment;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, no_content},
};

/// Comment request.
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
}

/// Comment response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub comment_id: String,
    pub photo_id: String,
    pub user_id: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl From<comment::Model> for CommentResponse {
    fn from(c: comment::Model) -> Self {
        Self {
            comment_id: c.comment_id,
            photo_id: c.photo_id,
            user_id: c.user_id,
            content: c.content,
            timestamp: c.timestamp,
        }
    }
}

/// Comments on a photo, newest first.
async fn list_comments(
    AuthUser(_me): AuthUser,
    State(state): State<AppState>,
    Path(photo_id): Path<String>,
) -> AppResult<ApiResponse<Vec<CommentView>>> {
    let comments = state.comment_service.list(&photo_id).await?;
    Ok(ApiResponse::ok(comments))
}

/// Comment on a photo.
async fn add_comment(
    AuthUser(me): AuthUser,
    State(state): State<AppState>,
    Path(photo_id): Path<String>,
    Json(req): Json<CreateCommentRequest>,
) -> AppResult<(StatusCode, ApiResponse<CommentResponse>)> {
    let comment = state
        .comment_service
        .add(&me.user_id, &photo_id, &req.content)
        .await?;
    Ok(ApiResponse::created(comment.into()))
}

/// Delete a comment.
async fn delete_comment(
    AuthUser(me): AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state
        .comment_service
        .delete(&me.user_id, &comment_id)
        .await?;
    Ok(no_content())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/photos/{photo_id}/comments",
            get(list_comments).post(add_comment),
        )
        .route("/comments/{comment_id}", delete(delete_comment))
}
