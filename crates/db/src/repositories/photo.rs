//! Photo repository.

use std::sync::Arc;

use crate::entities::{Ban, Comment, Follow, Like, Photo, ban, comment, follow, like, photo};
use crate::{EntityKind, IdAllocator};
use shutter_common::{AppError, AppResult};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionError, TransactionTrait,
    sea_query::Query,
};
use tracing::debug;

/// Photo repository for database operations.
#[derive(Clone)]
pub struct PhotoRepository {
    db: Arc<DatabaseConnection>,
    ids: IdAllocator,
}

impl PhotoRepository {
    /// Create a new photo repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>, ids: IdAllocator) -> Self {
        Self { db, ids }
    }

    /// Find a photo by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<photo::Model>> {
        Photo::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a photo by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<photo::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::PhotoNotFound(id.to_string()))
    }

    /// Check whether a photo exists without loading its payload.
    pub async fn exists(&self, id: &str) -> AppResult<bool> {
        let count = Photo::find_by_id(id)
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Store a photo under a freshly allocated id.
    pub async fn create(
        &self,
        user_id: &str,
        image_data: Vec<u8>,
        timestamp: DateTime<Utc>,
    ) -> AppResult<photo::Model> {
        let conn = self.db.as_ref();
        self.ids
            .insert_with_fresh_id(conn, EntityKind::Photo, |photo_id| {
                let model = photo::ActiveModel {
                    photo_id: Set(photo_id),
                    user_id: Set(user_id.to_string()),
                    image_data: Set(image_data.clone()),
                    timestamp: Set(timestamp),
                };
                async move { model.insert(conn).await }
            })
            .await
    }

    /// All photos, in no particular order.
    pub async fn find_all(&self) -> AppResult<Vec<photo::Model>> {
        Photo::find()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Ids of the photos uploaded by `user_id`, newest first.
    pub async fn find_ids_by_user(&self, user_id: &str) -> AppResult<Vec<String>> {
        Photo::find()
            .select_only()
            .column(photo::Column::PhotoId)
            .filter(photo::Column::UserId.eq(user_id))
            .order_by_desc(photo::Column::Timestamp)
            .into_tuple::<String>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Ids of photos uploaded by users `viewer_id` follows, minus uploaders `viewer_id`
    /// has banned. Bans pointing at the viewer do not filter anything here.
    pub async fn find_stream_ids(&self, viewer_id: &str) -> AppResult<Vec<String>> {
        let followed = Query::select()
            .column(follow::Column::UserId)
            .from(Follow)
            .and_where(follow::Column::FollowerId.eq(viewer_id))
            .to_owned();
        let banned = Query::select()
            .column(ban::Column::BannedUser)
            .from(Ban)
            .and_where(ban::Column::BannedBy.eq(viewer_id))
            .to_owned();

        Photo::find()
            .select_only()
            .column(photo::Column::PhotoId)
            .filter(photo::Column::UserId.in_subquery(followed))
            .filter(photo::Column::UserId.not_in_subquery(banned))
            .order_by_desc(photo::Column::Timestamp)
            .into_tuple::<String>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a photo together with its comments and likes.
    ///
    /// Children go first, then the photo, all in one transaction; any failure rolls the
    /// whole thing back. Returns the number of photo rows removed (0 or 1).
    pub async fn delete_cascade(&self, photo_id: &str) -> AppResult<u64> {
        let photo_id = photo_id.to_string();

        self.db
            .transaction::<_, u64, DbErr>(|txn| {
                Box::pin(async move {
                    let comments = Comment::delete_many()
                        .filter(comment::Column::PhotoId.eq(photo_id.as_str()))
                        .exec(txn)
                        .await?;
                    let likes = Like::delete_many()
                        .filter(like::Column::PhotoId.eq(photo_id.as_str()))
                        .exec(txn)
                        .await?;
                    let photo = Photo::delete_by_id(photo_id.as_str()).exec(txn).await?;

                    debug!(
                        photo_id = %photo_id,
                        comments = comments.rows_affected,
                        likes = likes.rows_affected,
                        "Deleted photo with children"
                    );

                    Ok(photo.rows_affected)
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(e) => AppError::Database(e.to_string()),
                TransactionError::Transaction(e) => AppError::TransactionFailure(e.to_string()),
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::TestDatabase;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_photo(id: &str, user_id: &str) -> photo::Model {
        photo::Model {
            photo_id: id.to_string(),
            user_id: user_id.to_string(),
            image_data: vec![0x89, 0x50, 0x4e, 0x47],
            timestamp: Utc::now(),
        }
    }

    async fn seeded() -> (TestDatabase, PhotoRepository) {
        let db = TestDatabase::new().await.unwrap();
        db.execute(
            "INSERT INTO users (user_id, username) VALUES \
             ('u1', 'alice'), ('u2', 'bob'), ('u3', 'carol')",
        )
        .await
        .unwrap();
        let repo = PhotoRepository::new(db.arc(), IdAllocator::default());
        (db, repo)
    }

    async fn count(db: &TestDatabase, table: &str, photo_id: &str) -> i64 {
        use sea_orm::{ConnectionTrait, Statement};
        db.connection()
            .query_one(Statement::from_sql_and_values(
                DatabaseBackend::Sqlite,
                format!("SELECT COUNT(*) AS n FROM {table} WHERE photo_id = ?"),
                [photo_id.into()],
            ))
            .await
            .unwrap()
            .unwrap()
            .try_get::<i64>("", "n")
            .unwrap()
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let photo = create_test_photo("p1", "u1");
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([vec![photo.clone()]])
            .into_connection();
        let repo = PhotoRepository::new(Arc::new(db), IdAllocator::default());

        assert_eq!(repo.find_by_id("p1").await.unwrap(), Some(photo));
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([Vec::<photo::Model>::new()])
            .into_connection();
        let repo = PhotoRepository::new(Arc::new(db), IdAllocator::default());

        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::PhotoNotFound(_))));
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let (_db, repo) = seeded().await;

        let p = repo.create("u1", vec![1, 2, 3], Utc::now()).await.unwrap();

        assert_eq!(p.photo_id.len(), 10);
        assert!(repo.exists(&p.photo_id).await.unwrap());
        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].image_data, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_stream_ids_follow_and_ban() {
        let (db, repo) = seeded().await;
        let older = Utc::now() - chrono::Duration::minutes(5);
        let p2_old = repo.create("u2", vec![1], older).await.unwrap();
        let p2_new = repo.create("u2", vec![2], Utc::now()).await.unwrap();
        let p3 = repo.create("u3", vec![3], Utc::now()).await.unwrap();

        db.execute("INSERT INTO follows (user_id, follower_id) VALUES ('u2', 'u1'), ('u3', 'u1')")
            .await
            .unwrap();
        // u1 bans u3; u2 bans u1 (which must not matter here).
        db.execute(
            "INSERT INTO bans (ban_id, banned_by, banned_user, timestamp) VALUES \
             ('b1', 'u1', 'u3', '2025-01-01T00:00:00+00:00'), \
             ('b2', 'u2', 'u1', '2025-01-01T00:00:00+00:00')",
        )
        .await
        .unwrap();

        let stream = repo.find_stream_ids("u1").await.unwrap();

        assert_eq!(stream, vec![p2_new.photo_id, p2_old.photo_id]);
        assert!(!stream.contains(&p3.photo_id));
    }

    #[tokio::test]
    async fn test_delete_cascade_removes_children() {
        let (db, repo) = seeded().await;
        let p = repo.create("u1", vec![1], Utc::now()).await.unwrap();
        let pid = p.photo_id.as_str();
        db.execute(&format!(
            "INSERT INTO comments (comment_id, photo_id, user_id, content, timestamp) VALUES \
             ('c1', '{pid}', 'u2', 'nice', '2025-01-01T00:00:00+00:00'), \
             ('c2', '{pid}', 'u3', 'wow', '2025-01-01T00:00:00+00:00')"
        ))
        .await
        .unwrap();
        db.execute(&format!(
            "INSERT INTO likes (user_id, photo_id, timestamp) VALUES \
             ('u2', '{pid}', '2025-01-01T00:00:00+00:00')"
        ))
        .await
        .unwrap();

        assert_eq!(repo.delete_cascade(pid).await.unwrap(), 1);

        assert!(!repo.exists(pid).await.unwrap());
        assert_eq!(count(&db, "comments", pid).await, 0);
        assert_eq!(count(&db, "likes", pid).await, 0);
    }

    #[tokio::test]
    async fn test_delete_cascade_rolls_back_on_failure() {
        let (db, repo) = seeded().await;
        let p = repo.create("u1", vec![1], Utc::now()).await.unwrap();
        let pid = p.photo_id.as_str();
        db.execute(&format!(
            "INSERT INTO comments (comment_id, photo_id, user_id, content, timestamp) VALUES \
             ('c1', '{pid}', 'u2', 'nice', '2025-01-01T00:00:00+00:00')"
        ))
        .await
        .unwrap();
        db.execute(&format!(
            "INSERT INTO likes (user_id, photo_id, timestamp) VALUES \
             ('u2', '{pid}', '2025-01-01T00:00:00+00:00')"
        ))
        .await
        .unwrap();
        // The last step of the cascade fails after the children are gone.
        db.execute(
            "CREATE TRIGGER fail_photo_delete BEFORE DELETE ON photos \
             BEGIN SELECT RAISE(ABORT, 'simulated failure'); END",
        )
        .await
        .unwrap();

        let result = repo.delete_cascade(pid).await;

        assert!(matches!(result, Err(AppError::TransactionFailure(_))));
        assert!(repo.exists(pid).await.unwrap());
        assert_eq!(count(&db, "comments", pid).await, 1);
        assert_eq!(count(&db, "likes", pid).await, 1);
    }
}
