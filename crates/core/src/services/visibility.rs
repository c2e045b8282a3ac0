//! Visibility service: what a given viewer gets to see.

use shutter_common::AppResult;
use shutter_db::{
    entities::user,
    repositories::{PhotoRepository, UserRepository},
};

/// Visibility service.
///
/// The stream only honours bans the viewer issued. The user directory hides users on
/// either side of a ban.
#[derive(Clone)]
pub struct VisibilityService {
    photo_repo: PhotoRepository,
    user_repo: UserRepository,
}

impl VisibilityService {
    /// Create a new visibility service.
    #[must_use]
    pub const fn new(photo_repo: PhotoRepository, user_repo: UserRepository) -> Self {
        Self {
            photo_repo,
            user_repo,
        }
    }

    /// Photo ids from followed users the viewer has not banned, newest first.
    pub async fn get_stream(&self, viewer_id: &str) -> AppResult<Vec<String>> {
        self.photo_repo.find_stream_ids(viewer_id).await
    }

    /// All users except those banned by, or banning, the viewer.
    pub async fn list_users(&self, viewer_id: &str) -> AppResult<Vec<user::Model>> {
        self.user_repo.find_all_visible_to(viewer_id).await
    }
}
