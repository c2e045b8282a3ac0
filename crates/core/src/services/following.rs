//! Following service.

use shutter_common::{AppError, AppResult};
use shutter_db::repositories::{FollowRepository, UserRepository};

/// Following service for business logic.
#[derive(Clone)]
pub struct FollowingService {
    follow_repo: FollowRepository,
    user_repo: UserRepository,
}

impl FollowingService {
    /// Create a new following service.
    #[must_use]
    pub const fn new(follow_repo: FollowRepository, user_repo: UserRepository) -> Self {
        Self {
            follow_repo,
            user_repo,
        }
    }

    /// Follow a user.
    ///
    /// Existing bans in either direction do not prevent following.
    pub async fn follow(&self, follower_id: &str, followed_id: &str) -> AppResult<()> {
        // Can't follow yourself
        if follower_id == followed_id {
            return Err(AppError::InvalidOperation(
                "Cannot follow yourself".to_string(),
            ));
        }

        self.user_repo.get_by_id(followed_id).await?;

        self.follow_repo
            .create(follower_id, followed_id)
            .await
            .map(|_| ())
            .map_err(|e| match e {
                AppError::Conflict(_) => AppError::Conflict("Already following".to_string()),
                other => other,
            })
    }

    /// Unfollow a user. Unfollowing someone not followed is a no-op.
    pub async fn unfollow(&self, follower_id: &str, followed_id: &str) -> AppResult<()> {
        if follower_id == followed_id {
            return Err(AppError::InvalidOperation(
                "Cannot unfollow yourself".to_string(),
            ));
        }

        self.follow_repo
            .delete_by_pair(follower_id, followed_id)
            .await?;
        Ok(())
    }

    /// Check if `followed_id` is followed by `follower_id`.
    pub async fn is_followed(&self, followed_id: &str, follower_id: &str) -> AppResult<bool> {
        self.follow_repo.exists(follower_id, followed_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::Services;
    use shutter_common::AppError;
    use shutter_db::{IdAllocator, test_utils::TestDatabase};

    async fn setup() -> (TestDatabase, Services, String, String) {
        let db = TestDatabase::new().await.unwrap();
        let s = Services::new(db.arc(), IdAllocator::default());
        let a = s.user.register("anna").await.unwrap().user_id;
        let b = s.user.register("ben").await.unwrap().user_id;
        (db, s, a, b)
    }

    #[tokio::test]
    async fn test_follow_self_is_invalid() {
        let (_db, s, a, _) = setup().await;

        assert!(matches!(
            s.following.follow(&a, &a).await,
            Err(AppError::InvalidOperation(_))
        ));
        assert!(matches!(
            s.following.unfollow(&a, &a).await,
            Err(AppError::InvalidOperation(_))
        ));
    }

    #[tokio::test]
    async fn test_follow_unknown_user() {
        let (_db, s, a, _) = setup().await;

        assert!(matches!(
            s.following.follow(&a, "ghost").await,
            Err(AppError::UserNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_follow_is_directed_and_unique() {
        let (_db, s, a, b) = setup().await;

        s.following.follow(&a, &b).await.unwrap();

        assert!(s.following.is_followed(&b, &a).await.unwrap());
        assert!(!s.following.is_followed(&a, &b).await.unwrap());
        assert!(matches!(
            s.following.follow(&a, &b).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_follow_survives_ban() {
        let (_db, s, a, b) = setup().await;
        s.following.follow(&a, &b).await.unwrap();

        s.ban.ban(&a, &b).await.unwrap();

        assert!(s.following.is_followed(&b, &a).await.unwrap());
    }
}
