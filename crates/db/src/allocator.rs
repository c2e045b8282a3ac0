//! Store-backed identifier allocation.
//!
//! Candidate ids come from [`IdGenerator`]. An existence check against the target
//! table filters out most collisions up front, but only the insert itself is
//! authoritative: [`IdAllocator::insert_with_fresh_id`] treats a primary key
//! violation as a signal to draw again.

use std::future::Future;

use sea_orm::{ConnectionTrait, DbErr, EntityTrait, PaginatorTrait};
use shutter_common::{AppError, AppResult, IdGenerator, config::IdentifierConfig};
use tracing::{debug, warn};

use crate::entities::{Ban, Comment, Photo, User};
use crate::is_unique_violation;

/// Entity types that receive allocated identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// `users.user_id`
    User,
    /// `photos.photo_id`
    Photo,
    /// `comments.comment_id`
    Comment,
    /// `bans.ban_id`
    Ban,
}

impl EntityKind {
    /// Table holding the entity.
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Photo => "photos",
            Self::Comment => "comments",
            Self::Ban => "bans",
        }
    }

    /// Primary key column.
    #[must_use]
    pub const fn id_column(self) -> &'static str {
        match self {
            Self::User => "user_id",
            Self::Photo => "photo_id",
            Self::Comment => "comment_id",
            Self::Ban => "ban_id",
        }
    }

    /// Human-readable name used in error messages.
    #[must_use]
    pub const fn noun(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Photo => "photo",
            Self::Comment => "comment",
            Self::Ban => "ban",
        }
    }

    /// Whether `err` is a uniqueness violation on this kind's primary key rather than
    /// on some other unique column of the same table.
    fn is_id_collision(self, err: &DbErr) -> bool {
        let qualified = format!("{}.{}", self.table(), self.id_column());
        is_unique_violation(err) && err.to_string().contains(&qualified)
    }
}

/// Allocates identifiers that are unique within their entity's table.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    generator: IdGenerator,
    max_attempts: u32,
}

impl IdAllocator {
    /// Default number of draws before giving up.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 16;

    /// Create an allocator with an explicit generator and retry budget.
    #[must_use]
    pub fn new(generator: IdGenerator, max_attempts: u32) -> Self {
        Self {
            generator,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Create an allocator from configuration.
    #[must_use]
    pub fn from_config(config: &IdentifierConfig) -> Self {
        Self::new(IdGenerator::with_length(config.length), config.max_attempts)
    }

    /// Draw an identifier not currently present in `kind`'s table.
    pub async fn allocate<C: ConnectionTrait>(&self, conn: &C, kind: EntityKind) -> AppResult<String> {
        for attempt in 1..=self.max_attempts {
            let candidate = self.generator.generate();
            if !Self::is_taken(conn, kind, &candidate).await? {
                return Ok(candidate);
            }
            debug!(kind = kind.noun(), attempt, "Identifier collision, drawing again");
        }

        warn!(kind = kind.noun(), attempts = self.max_attempts, "Identifier allocation exhausted");
        Err(AppError::AllocationExhausted(kind.noun().to_string()))
    }

    /// Allocate an identifier and run `insert` with it, drawing again whenever the insert
    /// reports that the identifier was claimed in the meantime.
    ///
    /// Uniqueness violations on any other column surface as [`AppError::Conflict`].
    pub async fn insert_with_fresh_id<C, F, Fut, T>(
        &self,
        conn: &C,
        kind: EntityKind,
        mut insert: F,
    ) -> AppResult<T>
    where
        C: ConnectionTrait,
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<T, DbErr>>,
    {
        for attempt in 1..=self.max_attempts {
            let id = self.allocate(conn, kind).await?;
            match insert(id).await {
                Ok(value) => return Ok(value),
                Err(e) if kind.is_id_collision(&e) => {
                    debug!(kind = kind.noun(), attempt, "Identifier claimed concurrently, retrying");
                }
                Err(e) if is_unique_violation(&e) => {
                    return Err(AppError::Conflict(format!("{} already exists", kind.noun())));
                }
                Err(e) => return Err(AppError::Database(e.to_string())),
            }
        }

        warn!(kind = kind.noun(), attempts = self.max_attempts, "Identifier allocation exhausted");
        Err(AppError::AllocationExhausted(kind.noun().to_string()))
    }

    async fn is_taken<C: ConnectionTrait>(conn: &C, kind: EntityKind, id: &str) -> AppResult<bool> {
        let count = match kind {
            EntityKind::User => User::find_by_id(id).count(conn).await,
            EntityKind::Photo => Photo::find_by_id(id).count(conn).await,
            EntityKind::Comment => Comment::find_by_id(id).count(conn).await,
            EntityKind::Ban => Ban::find_by_id(id).count(conn).await,
        }
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count > 0)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new(IdGenerator::new(), Self::DEFAULT_MAX_ATTEMPTS)
    }
}
