//! Like repository.

use std::sync::Arc;

use crate::entities::{Like, like};
use shutter_common::{AppError, AppResult};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};

/// Like repository for database operations.
#[derive(Clone)]
pub struct LikeRepository {
    db: Arc<DatabaseConnection>,
}

impl LikeRepository {
    /// Create a new like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Record that `user_id` likes `photo_id`.
    ///
    /// Liking the same photo twice is rejected with [`AppError::Conflict`].
    pub async fn create(
        &self,
        user_id: &str,
        photo_id: &str,
        timestamp: DateTime<Utc>,
    ) -> AppResult<like::Model> {
        like::ActiveModel {
            user_id: Set(user_id.to_string()),
            photo_id: Set(photo_id.to_string()),
            timestamp: Set(timestamp),
        }
        .insert(self.db.as_ref())
        .await
        .map_err(|e| {
            if crate::is_unique_violation(&e) {
                AppError::Conflict("Photo already liked".to_string())
            } else {
                AppError::Database(e.to_string())
            }
        })
    }

    /// Remove a like if present.
    pub async fn delete(&self, user_id: &str, photo_id: &str) -> AppResult<u64> {
        Like::delete_by_id((user_id.to_string(), photo_id.to_string()))
            .exec(self.db.as_ref())
            .await
            .map(|res| res.rows_affected)
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check whether `user_id` likes `photo_id`.
    pub async fn exists(&self, user_id: &str, photo_id: &str) -> AppResult<bool> {
        Like::find_by_id((user_id.to_string(), photo_id.to_string()))
            .one(self.db.as_ref())
            .await
            .map(|like| like.is_some())
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count likes on a photo.
    pub async fn count_by_photo(&self, photo_id: &str) -> AppResult<u64> {
        Like::find()
            .filter(like::Column::PhotoId.eq(photo_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::TestDatabase;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_exists_found_mock() {
        let like = like::Model {
            user_id: "u1".to_string(),
            photo_id: "p1".to_string(),
            timestamp: Utc::now(),
        };
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([vec![like]])
            .into_connection();
        let repo = LikeRepository::new(Arc::new(db));

        assert!(repo.exists("u1", "p1").await.unwrap());
    }

    #[tokio::test]
    async fn test_exists_missing_mock() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([Vec::<like::Model>::new()])
            .into_connection();
        let repo = LikeRepository::new(Arc::new(db));

        assert!(!repo.exists("u1", "p1").await.unwrap());
    }

    #[tokio::test]
    async fn test_like_twice_is_conflict() {
        let db = TestDatabase::new().await.unwrap();
        db.execute("INSERT INTO users (user_id, username) VALUES ('u1', 'alice')")
            .await
            .unwrap();
        db.execute(
            "INSERT INTO photos (photo_id, user_id, image_data, timestamp) \
             VALUES ('p1', 'u1', x'00', '2025-01-01T00:00:00+00:00')",
        )
        .await
        .unwrap();
        let repo = LikeRepository::new(db.arc());

        repo.create("u1", "p1", Utc::now()).await.unwrap();
        let second = repo.create("u1", "p1", Utc::now()).await;

        assert!(matches!(second, Err(AppError::Conflict(_))));
        assert_eq!(repo.count_by_photo("p1").await.unwrap(), 1);

        assert_eq!(repo.delete("u1", "p1").await.unwrap(), 1);
        assert_eq!(repo.count_by_photo("p1").await.unwrap(), 0);
    }
}
