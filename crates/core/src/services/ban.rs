//! Ban service.

use chrono::Utc;
use shutter_common::{AppError, AppResult};
use shutter_db::{
    entities::ban,
    repositories::{BanInsert, BanRepository, UserRepository},
};

/// Ban service for business logic.
#[derive(Clone)]
pub struct BanService {
    ban_repo: BanRepository,
    user_repo: UserRepository,
}

impl BanService {
    /// Create a new ban service.
    #[must_use]
    pub const fn new(ban_repo: BanRepository, user_repo: UserRepository) -> Self {
        Self {
            ban_repo,
            user_repo,
        }
    }

    /// Ban a user.
    ///
    /// Refused with [`AppError::Forbidden`] when the target already bans the initiator,
    /// and with [`AppError::Conflict`] when the ban already exists.
    pub async fn ban(&self, banner_id: &str, banned_id: &str) -> AppResult<ban::Model> {
        // Cannot ban yourself
        if banner_id == banned_id {
            return Err(AppError::InvalidOperation("Cannot ban yourself".to_string()));
        }

        self.user_repo.get_by_id(banned_id).await?;

        if self.ban_repo.exists(banned_id, banner_id).await? {
            return Err(reciprocal_ban());
        }

        if self.ban_repo.exists(banner_id, banned_id).await? {
            return Err(AppError::Conflict("Already banned".to_string()));
        }

        // The checks above only classify errors; the insert re-checks atomically.
        match self
            .ban_repo
            .create_guarded(banner_id, banned_id, Utc::now())
            .await?
        {
            BanInsert::Created(ban) => Ok(ban),
            BanInsert::Reciprocal => Err(reciprocal_ban()),
        }
    }

    /// Lift a ban. Lifting a ban that does not exist is a no-op.
    pub async fn unban(&self, banner_id: &str, banned_id: &str) -> AppResult<()> {
        if banner_id == banned_id {
            return Err(AppError::InvalidOperation(
                "Cannot unban yourself".to_string(),
            ));
        }

        self.ban_repo.delete_by_pair(banner_id, banned_id).await?;
        Ok(())
    }

    /// Check if `banner_id` bans `banned_id`.
    pub async fn ban_exists(&self, banner_id: &str, banned_id: &str) -> AppResult<bool> {
        self.ban_repo.exists(banner_id, banned_id).await
    }
}

fn reciprocal_ban() -> AppError {
    AppError::Forbidden("You are banned by this user".to_string())
}
