//! Comment service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shutter_common::{AppError, AppResult};
use shutter_db::{
    entities::{comment, user},
    repositories::{CommentRepository, PhotoRepository},
};
use validator::Validate;

/// Input for adding a comment.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentInput {
    /// Comment text, 1 to 2048 characters.
    #[validate(length(min = 1, max = 2048))]
    pub content: String,
}

/// A comment resolved with its author's current username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    /// Comment id.
    pub comment_id: String,
    /// Photo commented on.
    pub photo_id: String,
    /// Author id.
    pub user_id: String,
    /// Author's current username, empty if the author is gone.
    pub username: String,
    /// Comment text.
    pub content: String,
    /// When the comment was posted.
    pub timestamp: DateTime<Utc>,
}

impl From<(comment::Model, Option<user::Model>)> for CommentView {
    fn from((comment, author): (comment::Model, Option<user::Model>)) -> Self {
        Self {
            comment_id: comment.comment_id,
            photo_id: comment.photo_id,
            user_id: comment.user_id,
            username: author.map(|u| u.username).unwrap_or_default(),
            content: comment.content,
            timestamp: comment.timestamp,
        }
    }
}

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    photo_repo: PhotoRepository,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(comment_repo: CommentRepository, photo_repo: PhotoRepository) -> Self {
        Self {
            comment_repo,
            photo_repo,
        }
    }

    /// Comment on a photo.
    pub async fn add(
        &self,
        user_id: &str,
        photo_id: &str,
        content: &str,
    ) -> AppResult<comment::Model> {
        CreateCommentInput {
            content: content.to_string(),
        }
        .validate()?;
        if content.trim().is_empty() {
            return Err(AppError::Validation("Comment is blank".to_string()));
        }

        self.ensure_photo(photo_id).await?;

        self.comment_repo
            .create(photo_id, user_id, content, Utc::now())
            .await
    }

    /// Comments on a photo with author names, newest first.
    pub async fn list(&self, photo_id: &str) -> AppResult<Vec<CommentView>> {
        self.ensure_photo(photo_id).await?;

        let rows = self
            .comment_repo
            .find_by_photo_with_authors(photo_id)
            .await?;
        Ok(rows.into_iter().map(CommentView::from).collect())
    }

    /// Delete a comment. Allowed to its author and to the owner of the photo.
    pub async fn delete(&self, user_id: &str, comment_id: &str) -> AppResult<()> {
        let comment = self
            .comment_repo
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Comment {comment_id}")))?;

        if comment.user_id != user_id {
            let photo = self.photo_repo.get_by_id(&comment.photo_id).await?;
            if photo.user_id != user_id {
                return Err(AppError::Forbidden(
                    "Only the author or the photo owner can delete a comment".to_string(),
                ));
            }
        }

        self.comment_repo.delete(comment_id).await?;
        Ok(())
    }

    async fn ensure_photo(&self, photo_id: &str) -> AppResult<()> {
        if self.photo_repo.exists(photo_id).await? {
            Ok(())
        } else {
            Err(AppError::PhotoNotFound(photo_id.to_string()))
        }
    }
}
