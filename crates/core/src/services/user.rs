//! User service.

use serde::{Deserialize, Serialize};
use shutter_common::{AppError, AppResult};
use shutter_db::{
    entities::user,
    repositories::{FollowRepository, PhotoRepository, UserRepository},
};
use tracing::debug;
use validator::Validate;

/// A username as supplied by a client.
#[derive(Debug, Deserialize, Validate)]
pub struct UsernameInput {
    /// Requested name, 3 to 16 characters.
    #[validate(length(min = 3, max = 16))]
    pub username: String,
}

impl UsernameInput {
    fn check(username: &str) -> AppResult<()> {
        Self {
            username: username.to_string(),
        }
        .validate()?;
        Ok(())
    }
}

/// A user together with their follow edges and uploads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// User id.
    pub user_id: String,
    /// Current username.
    pub username: String,
    /// Users following this user.
    pub followers: Vec<String>,
    /// Users this user follows.
    pub following: Vec<String>,
    /// Photo ids, newest first.
    pub photos: Vec<String>,
}

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    follow_repo: FollowRepository,
    photo_repo: PhotoRepository,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        follow_repo: FollowRepository,
        photo_repo: PhotoRepository,
    ) -> Self {
        Self {
            user_repo,
            follow_repo,
            photo_repo,
        }
    }

    /// Register a new user.
    pub async fn register(&self, username: &str) -> AppResult<user::Model> {
        UsernameInput::check(username)?;

        // Check if username is taken
        if self.user_repo.find_by_username(username).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Username already taken: {username}"
            )));
        }

        self.user_repo.create(username).await
    }

    /// Look a user up by name, creating them if absent.
    ///
    /// Returns the user and whether it was created by this call.
    pub async fn login(&self, username: &str) -> AppResult<(user::Model, bool)> {
        UsernameInput::check(username)?;

        if let Some(user) = self.user_repo.find_by_username(username).await? {
            return Ok((user, false));
        }

        match self.user_repo.create(username).await {
            Ok(user) => Ok((user, true)),
            Err(AppError::Conflict(_)) => {
                // A concurrent login created the same name first.
                debug!(username, "Lost registration race, reusing existing user");
                let user = self
                    .user_repo
                    .find_by_username(username)
                    .await?
                    .ok_or_else(|| AppError::UserNotFound(username.to_string()))?;
                Ok((user, false))
            }
            Err(e) => Err(e),
        }
    }

    /// Resolve the acting user from a bearer token (the token is the user id).
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_id(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Get a user by ID.
    pub async fn get_user(&self, user_id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(user_id).await
    }

    /// Get a user's current username.
    pub async fn get_username(&self, user_id: &str) -> AppResult<String> {
        Ok(self.user_repo.get_by_id(user_id).await?.username)
    }

    /// Rename a user. The new name must not belong to anyone else, ignoring case.
    pub async fn set_username(&self, user_id: &str, username: &str) -> AppResult<user::Model> {
        UsernameInput::check(username)?;

        self.user_repo.get_by_id(user_id).await?;

        if self
            .user_repo
            .username_taken_by_other(user_id, username)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "Username already taken: {username}"
            )));
        }

        self.user_repo.update_username(user_id, username).await
    }

    /// Profile of the user with this id.
    pub async fn get_profile_by_id(&self, user_id: &str) -> AppResult<UserProfile> {
        let user = self.user_repo.get_by_id(user_id).await?;
        self.assemble_profile(user).await
    }

    /// Profile of the user with this name, ignoring case.
    pub async fn get_profile_by_username(&self, username: &str) -> AppResult<UserProfile> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::UserNotFound(username.to_string()))?;
        self.assemble_profile(user).await
    }

    async fn assemble_profile(&self, user: user::Model) -> AppResult<UserProfile> {
        let (followers, following, photos) = tokio::try_join!(
            self.follow_repo.follower_ids(&user.user_id),
            self.follow_repo.following_ids(&user.user_id),
            self.photo_repo.find_ids_by_user(&user.user_id),
        )?;

        Ok(UserProfile {
            user_id: user.user_id,
            username: user.username,
            followers,
            following,
            photos,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::Services;
    use shutter_db::{IdAllocator, test_utils::TestDatabase};

    async fn setup() -> (TestDatabase, Services) {
        let db = TestDatabase::new().await.unwrap();
        let services = Services::new(db.arc(), IdAllocator::default());
        (db, services)
    }

    #[tokio::test]
    async fn test_register_rejects_taken_name_any_case() {
        let (_db, s) = setup().await;
        s.user.register("Maria").await.unwrap();

        let result = s.user.register("maria").await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_validates_length() {
        let (_db, s) = setup().await;

        assert!(matches!(
            s.user.register("ab").await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            s.user.register("a_very_long_username").await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_login_gets_or_creates() {
        let (_db, s) = setup().await;

        let (first, created) = s.user.login("maria").await.unwrap();
        assert!(created);

        let (again, created) = s.user.login("MARIA").await.unwrap();
        assert!(!created);
        assert_eq!(again.user_id, first.user_id);
    }

    #[tokio::test]
    async fn test_authenticate_by_token() {
        let (_db, s) = setup().await;
        let (user, _) = s.user.login("maria").await.unwrap();

        let acting = s.user.authenticate_by_token(&user.user_id).await.unwrap();
        assert_eq!(acting, user);

        assert!(matches!(
            s.user.authenticate_by_token("bogus").await,
            Err(AppError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_set_username() {
        let (_db, s) = setup().await;
        let maria = s.user.register("maria").await.unwrap();
        s.user.register("lucas").await.unwrap();

        assert!(matches!(
            s.user.set_username(&maria.user_id, "Lucas").await,
            Err(AppError::Conflict(_))
        ));

        // Re-casing one's own name is fine.
        s.user.set_username(&maria.user_id, "Maria").await.unwrap();
        assert_eq!(s.user.get_username(&maria.user_id).await.unwrap(), "Maria");

        assert!(matches!(
            s.user.set_username("nobody", "ghost").await,
            Err(AppError::UserNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_profile_composes_edges_and_photos() {
        let (_db, s) = setup().await;
        let maria = s.user.register("maria").await.unwrap();
        let lucas = s.user.register("lucas").await.unwrap();
        s.following.follow(&lucas.user_id, &maria.user_id).await.unwrap();
        let png = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0];
        let photo = s.photo.upload(&maria.user_id, png.to_vec()).await.unwrap();

        let by_id = s.user.get_profile_by_id(&maria.user_id).await.unwrap();
        assert_eq!(by_id.followers, vec![lucas.user_id.clone()]);
        assert!(by_id.following.is_empty());
        assert_eq!(by_id.photos, vec![photo.photo_id]);

        let by_name = s.user.get_profile_by_username("MARIA").await.unwrap();
        assert_eq!(by_name, by_id);

        let lucas_profile = s.user.get_profile_by_id(&lucas.user_id).await.unwrap();
        assert_eq!(lucas_profile.following, vec![maria.user_id]);
    }

    #[tokio::test]
    async fn test_profile_not_found() {
        let (_db, s) = setup().await;

        assert!(matches!(
            s.user.get_profile_by_id("missing").await,
            Err(AppError::UserNotFound(_))
        ));
        assert!(matches!(
            s.user.get_profile_by_username("missing").await,
            Err(AppError::UserNotFound(_))
        ));
    }
}
