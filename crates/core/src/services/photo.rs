//! Photo service.

use chrono::{DateTime, Utc};
use shutter_common::{AppError, AppResult};
use shutter_db::{
    entities::photo,
    repositories::{CommentRepository, LikeRepository, PhotoRepository, UserRepository},
};
use tracing::debug;

use super::comment::CommentView;

/// A photo with its uploader's name, like count and comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoDetail {
    /// Photo id.
    pub photo_id: String,
    /// Uploader id.
    pub user_id: String,
    /// Uploader's current username.
    pub username: String,
    /// Raw image bytes.
    pub image_data: Vec<u8>,
    /// Upload time.
    pub timestamp: DateTime<Utc>,
    /// Like count.
    pub likes: u64,
    /// Newest first.
    pub comments: Vec<CommentView>,
}

/// Photo service for business logic.
#[derive(Clone)]
pub struct PhotoService {
    photo_repo: PhotoRepository,
    comment_repo: CommentRepository,
    like_repo: LikeRepository,
    user_repo: UserRepository,
}

impl PhotoService {
    /// Create a new photo service.
    #[must_use]
    pub const fn new(
        photo_repo: PhotoRepository,
        comment_repo: CommentRepository,
        like_repo: LikeRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            photo_repo,
            comment_repo,
            like_repo,
            user_repo,
        }
    }

    /// Store an uploaded image.
    ///
    /// The payload has to be recognisable as an image; its content is stored as is.
    pub async fn upload(&self, user_id: &str, image_data: Vec<u8>) -> AppResult<photo::Model> {
        if image_data.is_empty() {
            return Err(AppError::BadRequest("Image payload is empty".to_string()));
        }

        let format = image::guess_format(&image_data)
            .map_err(|_| AppError::BadRequest("Unrecognised image format".to_string()))?;
        debug!(user_id, ?format, bytes = image_data.len(), "Storing photo");

        self.photo_repo.create(user_id, image_data, Utc::now()).await
    }

    /// Every photo.
    pub async fn list(&self) -> AppResult<Vec<photo::Model>> {
        self.photo_repo.find_all().await
    }

    /// Get a photo by ID.
    pub async fn get(&self, photo_id: &str) -> AppResult<photo::Model> {
        self.photo_repo.get_by_id(photo_id).await
    }

    /// Delete a photo with all its comments and likes. Only the uploader may do this.
    pub async fn delete(&self, user_id: &str, photo_id: &str) -> AppResult<()> {
        let photo = self.photo_repo.get_by_id(photo_id).await?;
        if photo.user_id != user_id {
            return Err(AppError::Forbidden(
                "Only the uploader can delete a photo".to_string(),
            ));
        }

        if self.photo_repo.delete_cascade(photo_id).await? == 0 {
            // Deleted concurrently.
            return Err(AppError::PhotoNotFound(photo_id.to_string()));
        }
        Ok(())
    }

    /// Photo with uploader name, like count and comments.
    pub async fn get_detail(&self, photo_id: &str) -> AppResult<PhotoDetail> {
        let photo = self.photo_repo.get_by_id(photo_id).await?;

        let (uploader, likes, comments) = tokio::try_join!(
            self.user_repo.get_by_id(&photo.user_id),
            self.like_repo.count_by_photo(photo_id),
            self.comment_repo.find_by_photo_with_authors(photo_id),
        )?;

        Ok(PhotoDetail {
            photo_id: photo.photo_id,
            user_id: photo.user_id,
            username: uploader.username,
            image_data: photo.image_data,
            timestamp: photo.timestamp,
            likes,
            comments: comments.into_iter().map(CommentView::from).collect(),
        })
    }
}
