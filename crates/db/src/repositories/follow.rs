//! Follow repository.

use std::sync::Arc;

use crate::entities::{Follow, follow};
use crate::insert_error;
use shutter_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

/// Follow repository for database operations.
#[derive(Clone)]
pub struct FollowRepository {
    db: Arc<DatabaseConnection>,
}

impl FollowRepository {
    /// Create a new follow repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert the edge `follower_id -> followed_id`.
    ///
    /// A duplicate edge is a [`AppError::Conflict`].
    pub async fn create(&self, follower_id: &str, followed_id: &str) -> AppResult<follow::Model> {
        follow::ActiveModel {
            user_id: Set(followed_id.to_string()),
            follower_id: Set(follower_id.to_string()),
        }
        .insert(self.db.as_ref())
        .await
        .map_err(|e| insert_error(e, "Follow"))
    }

    /// Delete the edge if present. Returns the number of rows removed.
    pub async fn delete_by_pair(&self, follower_id: &str, followed_id: &str) -> AppResult<u64> {
        Follow::delete_many()
            .filter(follow::Column::UserId.eq(followed_id))
            .filter(follow::Column::FollowerId.eq(follower_id))
            .exec(self.db.as_ref())
            .await
            .map(|res| res.rows_affected)
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check whether `follower_id` follows `followed_id`.
    pub async fn exists(&self, follower_id: &str, followed_id: &str) -> AppResult<bool> {
        let count = Follow::find_by_id((followed_id.to_string(), follower_id.to_string()))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Ids of users following `user_id`.
    pub async fn follower_ids(&self, user_id: &str) -> AppResult<Vec<String>> {
        Follow::find()
            .select_only()
            .column(follow::Column::FollowerId)
            .filter(follow::Column::UserId.eq(user_id))
            .order_by_asc(follow::Column::FollowerId)
            .into_tuple::<String>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Ids of users `user_id` follows.
    pub async fn following_ids(&self, user_id: &str) -> AppResult<Vec<String>> {
        Follow::find()
            .select_only()
            .column(follow::Column::UserId)
            .filter(follow::Column::FollowerId.eq(user_id))
            .order_by_asc(follow::Column::UserId)
            .into_tuple::<String>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
