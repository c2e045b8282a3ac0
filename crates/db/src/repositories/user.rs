//! User repository.

use std::sync::Arc;

use crate::entities::{Ban, User, ban, user};
use crate::{EntityKind, IdAllocator};
use shutter_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
    sea_query::{Expr, Query},
};

/// User repository for database operations.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
    ids: IdAllocator,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>, ids: IdAllocator) -> Self {
        Self { db, ids }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a user by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<user::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::UserNotFound(id.to_string()))
    }

    /// Find a user by username, ignoring case.
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<user::Model>> {
        // The column collates NOCASE, so plain equality is case-insensitive.
        User::find()
            .filter(user::Column::Username.eq(username))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check whether any user other than `user_id` holds `username`.
    pub async fn username_taken_by_other(&self, user_id: &str, username: &str) -> AppResult<bool> {
        let count = User::find()
            .filter(user::Column::Username.eq(username))
            .filter(user::Column::UserId.ne(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Create a user with a freshly allocated id.
    pub async fn create(&self, username: &str) -> AppResult<user::Model> {
        let conn = self.db.as_ref();
        self.ids
            .insert_with_fresh_id(conn, EntityKind::User, |user_id| {
                let model = user::ActiveModel {
                    user_id: Set(user_id),
                    username: Set(username.to_string()),
                };
                async move { model.insert(conn).await }
            })
            .await
            .map_err(|e| match e {
                AppError::Conflict(_) => username_taken(username),
                other => other,
            })
    }

    /// Rename a user in place.
    pub async fn update_username(&self, user_id: &str, username: &str) -> AppResult<user::Model> {
        let res = User::update_many()
            .col_expr(user::Column::Username, Expr::value(username))
            .filter(user::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| {
                if crate::is_unique_violation(&e) {
                    username_taken(username)
                } else {
                    AppError::Database(e.to_string())
                }
            })?;

        if res.rows_affected == 0 {
            return Err(AppError::UserNotFound(user_id.to_string()));
        }

        Ok(user::Model {
            user_id: user_id.to_string(),
            username: username.to_string(),
        })
    }

    /// Every user except those `viewer_id` bans and those who ban `viewer_id`.
    ///
    /// The viewer is included.
    pub async fn find_all_visible_to(&self, viewer_id: &str) -> AppResult<Vec<user::Model>> {
        let banned_by_viewer = Query::select()
            .column(ban::Column::BannedUser)
            .from(Ban)
            .and_where(ban::Column::BannedBy.eq(viewer_id))
            .to_owned();
        let banning_viewer = Query::select()
            .column(ban::Column::BannedBy)
            .from(Ban)
            .and_where(ban::Column::BannedUser.eq(viewer_id))
            .to_owned();

        User::find()
            .filter(user::Column::UserId.not_in_subquery(banned_by_viewer))
            .filter(user::Column::UserId.not_in_subquery(banning_viewer))
            .order_by_asc(user::Column::Username)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

fn username_taken(username: &str) -> AppError {
    AppError::Conflict(format!("Username already taken: {username}"))
}
