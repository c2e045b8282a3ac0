//! Comment repository.

use std::sync::Arc;

use crate::entities::{Comment, User, comment, user};
use crate::{EntityKind, IdAllocator};
use shutter_common::{AppError, AppResult};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

/// Comment repository for database operations.
#[derive(Clone)]
pub struct CommentRepository {
    db: Arc<DatabaseConnection>,
    ids: IdAllocator,
}

impl CommentRepository {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>, ids: IdAllocator) -> Self {
        Self { db, ids }
    }

    /// Find a comment by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<comment::Model>> {
        Comment::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store a comment under a freshly allocated id.
    pub async fn create(
        &self,
        photo_id: &str,
        user_id: &str,
        content: &str,
        timestamp: DateTime<Utc>,
    ) -> AppResult<comment::Model> {
        let conn = self.db.as_ref();
        self.ids
            .insert_with_fresh_id(conn, EntityKind::Comment, |comment_id| {
                let model = comment::ActiveModel {
                    comment_id: Set(comment_id),
                    photo_id: Set(photo_id.to_string()),
                    user_id: Set(user_id.to_string()),
                    content: Set(content.to_string()),
                    timestamp: Set(timestamp),
                };
                async move { model.insert(conn).await }
            })
            .await
    }

    /// Comments on a photo, newest first.
    pub async fn find_by_photo(&self, photo_id: &str) -> AppResult<Vec<comment::Model>> {
        Comment::find()
            .filter(comment::Column::PhotoId.eq(photo_id))
            .order_by_desc(comment::Column::Timestamp)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Comments on a photo joined with their authors, newest first.
    pub async fn find_by_photo_with_authors(
        &self,
        photo_id: &str,
    ) -> AppResult<Vec<(comment::Model, Option<user::Model>)>> {
        Comment::find()
            .find_also_related(User)
            .filter(comment::Column::PhotoId.eq(photo_id))
            .order_by_desc(comment::Column::Timestamp)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a comment. Returns the number of rows removed.
    pub async fn delete(&self, id: &str) -> AppResult<u64> {
        Comment::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map(|res| res.rows_affected)
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
