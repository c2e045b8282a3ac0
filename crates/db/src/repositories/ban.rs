//! Ban repository.

use std::sync::Arc;

use crate::entities::{Ban, ban};
use crate::{EntityKind, IdAllocator};
use shutter_common::{AppError, AppResult};
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    sea_query::{Expr, Query},
};

/// Result of a guarded ban insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BanInsert {
    /// The edge was stored.
    Created(ban::Model),
    /// Nothing was stored: the target already bans the initiator.
    Reciprocal,
}

/// Ban repository for database operations.
#[derive(Clone)]
pub struct BanRepository {
    db: Arc<DatabaseConnection>,
    ids: IdAllocator,
}

impl BanRepository {
    /// Create a new ban repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>, ids: IdAllocator) -> Self {
        Self { db, ids }
    }

    /// Find the edge `banned_by -> banned_user`.
    pub async fn find_by_pair(
        &self,
        banned_by: &str,
        banned_user: &str,
    ) -> AppResult<Option<ban::Model>> {
        Ban::find()
            .filter(ban::Column::BannedBy.eq(banned_by))
            .filter(ban::Column::BannedUser.eq(banned_user))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check whether `banned_by` bans `banned_user`.
    pub async fn exists(&self, banned_by: &str, banned_user: &str) -> AppResult<bool> {
        Ok(self.find_by_pair(banned_by, banned_user).await?.is_some())
    }

    /// Insert `banned_by -> banned_user` unless `banned_user -> banned_by` exists.
    ///
    /// The reverse-edge check and the insert are a single `INSERT ... SELECT ... WHERE NOT
    /// EXISTS` statement, so two users banning each other at the same time cannot both
    /// succeed. An existing identical edge is a [`AppError::Conflict`].
    pub async fn create_guarded(
        &self,
        banned_by: &str,
        banned_user: &str,
        timestamp: DateTime<Utc>,
    ) -> AppResult<BanInsert> {
        let conn = self.db.as_ref();

        let inserted = self
            .ids
            .insert_with_fresh_id(conn, EntityKind::Ban, |ban_id| async move {
                let reverse = Query::select()
                    .expr(Expr::val(1))
                    .from(Ban)
                    .and_where(ban::Column::BannedBy.eq(banned_user))
                    .and_where(ban::Column::BannedUser.eq(banned_by))
                    .to_owned();

                let row = Query::select()
                    .exprs([
                        Expr::val(ban_id.clone()),
                        Expr::val(banned_by),
                        Expr::val(banned_user),
                        Expr::val(timestamp),
                    ])
                    .and_where(Expr::exists(reverse).not())
                    .to_owned();

                let stmt = Query::insert()
                    .into_table(Ban)
                    .columns([
                        ban::Column::BanId,
                        ban::Column::BannedBy,
                        ban::Column::BannedUser,
                        ban::Column::Timestamp,
                    ])
                    .select_from(row)
                    .map_err(|e| DbErr::Custom(e.to_string()))?
                    .to_owned();

                let res = conn.execute(conn.get_database_backend().build(&stmt)).await?;

                Ok::<_, DbErr>((res.rows_affected() > 0).then(|| ban::Model {
                    ban_id,
                    banned_by: banned_by.to_string(),
                    banned_user: banned_user.to_string(),
                    timestamp,
                }))
            })
            .await
            .map_err(|e| match e {
                AppError::Conflict(_) => AppError::Conflict("Already banned".to_string()),
                other => other,
            })?;

        Ok(inserted.map_or(BanInsert::Reciprocal, BanInsert::Created))
    }

    /// Delete the edge if present. Returns the number of rows removed.
    pub async fn delete_by_pair(&self, banned_by: &str, banned_user: &str) -> AppResult<u64> {
        Ban::delete_many()
            .filter(ban::Column::BannedBy.eq(banned_by))
            .filter(ban::Column::BannedUser.eq(banned_user))
            .exec(self.db.as_ref())
            .await
            .map(|res| res.rows_affected)
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
