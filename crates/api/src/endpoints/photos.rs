//! Photo, stream and like endpoints.

use axum::{
    Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use shutter_common::AppResult;
use shutter_core::{CommentView, PhotoDetail};
use shutter_db::entities::photo;
use tracing::info;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, encode_image, no_content},
};

/// Largest accepted upload.
const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Photo response. `image_data` is base64.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoResponse {
    pub photo_id: String,
    pub user_id: String,
    pub image_data: String,
    pub timestamp: DateTime<Utc>,
}

impl From<photo::Model> for PhotoResponse {
    fn from(p: photo::Model) -> Self {
        Self {
            image_data: encode_image(&p.image_data),
            photo_id: p.photo_id,
            user_id: p.user_id,
            timestamp: p.timestamp,
        }
    }
}

/// Photo detail response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoDetailResponse {
    pub photo_id: String,
    pub user_id: String,
    pub username: String,
    pub image_data: String,
    pub timestamp: DateTime<Utc>,
    pub likes: u64,
    pub comments: Vec<CommentView>,
}

impl From<PhotoDetail> for PhotoDetailResponse {
    fn from(d: PhotoDetail) -> Self {
        Self {
            image_data: encode_image(&d.image_data),
            photo_id: d.photo_id,
            user_id: d.user_id,
            username: d.username,
            timestamp: d.timestamp,
            likes: d.likes,
            comments: d.comments,
        }
    }
}

/// Like state response.
#[derive(Debug, Serialize)]
pub struct LikedResponse {
    pub liked: bool,
}

/// List every photo.
async fn list_photos(
    AuthUser(_me): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<PhotoResponse>>> {
    let photos = state.photo_service.list().await?;
    Ok(ApiResponse::ok(photos.into_iter().map(Into::into).collect()))
}

/// Upload a photo. The request body is the raw image.
async fn upload_photo(
    AuthUser(me): AuthUser,
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<(StatusCode, ApiResponse<PhotoResponse>)> {
    let photo = state.photo_service.upload(&me.user_id, body.to_vec()).await?;
    info!(user_id = %me.user_id, photo_id = %photo.photo_id, "Photo uploaded");
    Ok(ApiResponse::created(photo.into()))
}

/// Photo with uploader, like count and comments.
async fn show_photo(
    AuthUser(_me): AuthUser,
    State(state): State<AppState>,
    Path(photo_id): Path<String>,
) -> AppResult<ApiResponse<PhotoDetailResponse>> {
    let detail = state.photo_service.get_detail(&photo_id).await?;
    Ok(ApiResponse::ok(detail.into()))
}

/// Delete one of the caller's photos.
async fn delete_photo(
    AuthUser(me): AuthUser,
    State(state): State<AppState>,
    Path(photo_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.photo_service.delete(&me.user_id, &photo_id).await?;
    info!(user_id = %me.user_id, photo_id = %photo_id, "Photo deleted");
    Ok(no_content())
}

/// The caller's stream: photo ids, newest first.
async fn stream(
    AuthUser(me): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<String>>> {
    let ids = state.visibility_service.get_stream(&me.user_id).await?;
    Ok(ApiResponse::ok(ids))
}

/// Whether the caller likes a photo.
async fn is_liked(
    AuthUser(me): AuthUser,
    State(state): State<AppState>,
    Path(photo_id): Path<String>,
) -> AppResult<ApiResponse<LikedResponse>> {
    let liked = state.like_service.is_liked(&me.user_id, &photo_id).await?;
    Ok(ApiResponse::ok(LikedResponse { liked }))
}

/// Like a photo.
async fn like_photo(
    AuthUser(me): AuthUser,
    State(state): State<AppState>,
    Path(photo_id): Path<String>,
) -> AppResult<StatusCode> {
    state.like_service.like(&me.user_id, &photo_id).await?;
    info!(user_id = %me.user_id, photo_id = %photo_id, "Photo liked");
    Ok(StatusCode::CREATED)
}

/// Remove a like.
async fn unlike_photo(
    AuthUser(me): AuthUser,
    State(state): State<AppState>,
    Path(photo_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.like_service.unlike(&me.user_id, &photo_id).await?;
    Ok(no_content())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/photos",
            get(list_photos)
                .post(upload_photo)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/photos/{photo_id}", get(show_photo).delete(delete_photo))
        .route(
            "/photos/{photo_id}/likes",
            get(is_liked).post(like_photo).delete(unlike_photo),
        )
        .route("/stream", get(stream))
}
