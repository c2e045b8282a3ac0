//! Like service.

use chrono::Utc;
use shutter_common::{AppError, AppResult};
use shutter_db::repositories::{LikeRepository, PhotoRepository};

/// Like service for business logic.
#[derive(Clone)]
pub struct LikeService {
    like_repo: LikeRepository,
    photo_repo: PhotoRepository,
}

impl LikeService {
    /// Create a new like service.
    #[must_use]
    pub const fn new(like_repo: LikeRepository, photo_repo: PhotoRepository) -> Self {
        Self {
            like_repo,
            photo_repo,
        }
    }

    /// Like a photo. Liking it a second time is a [`AppError::Conflict`].
    pub async fn like(&self, user_id: &str, photo_id: &str) -> AppResult<()> {
        if !self.photo_repo.exists(photo_id).await? {
            return Err(AppError::PhotoNotFound(photo_id.to_string()));
        }

        self.like_repo.create(user_id, photo_id, Utc::now()).await?;
        Ok(())
    }

    /// Remove a like. Removing a like that does not exist is a no-op.
    pub async fn unlike(&self, user_id: &str, photo_id: &str) -> AppResult<()> {
        self.like_repo.delete(user_id, photo_id).await?;
        Ok(())
    }

    /// Check if `user_id` likes `photo_id`.
    pub async fn is_liked(&self, user_id: &str, photo_id: &str) -> AppResult<bool> {
        self.like_repo.exists(user_id, photo_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::Services;
    use shutter_common::AppError;
    use shutter_db::{IdAllocator, test_utils::TestDatabase};

    const JPEG: &[u8] = &[0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

    #[tokio::test]
    async fn test_like_lifecycle() {
        let db = TestDatabase::new().await.unwrap();
        let s = Services::new(db.arc(), IdAllocator::default());
        let owner = s.user.register("owner").await.unwrap().user_id;
        let fan = s.user.register("fan").await.unwrap().user_id;
        let photo = s.photo.upload(&owner, JPEG.to_vec()).await.unwrap().photo_id;

        s.like.like(&fan, &photo).await.unwrap();
        assert!(s.like.is_liked(&fan, &photo).await.unwrap());

        assert!(matches!(
            s.like.like(&fan, &photo).await,
            Err(AppError::Conflict(_))
        ));

        s.like.unlike(&fan, &photo).await.unwrap();
        s.like.unlike(&fan, &photo).await.unwrap();
        assert!(!s.like.is_liked(&fan, &photo).await.unwrap());

        assert!(matches!(
            s.like.like(&fan, "missing").await,
            Err(AppError::PhotoNotFound(_))
        ));
    }
}
