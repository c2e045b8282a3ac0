//! Database layer for shutter.
//!
//! Entities, schema migrations and one repository per table. The identifier
//! allocator lives here too because it has to consult the tables it allocates for.

pub mod allocator;
pub mod entities;
pub mod migrations;
pub mod repositories;
pub mod test_utils;

pub use allocator::{EntityKind, IdAllocator};

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use shutter_common::{AppError, Config};
use std::time::Duration;
use tracing::log::LevelFilter;

/// Initialize database connection.
pub async fn init(config: &Config) -> Result<DatabaseConnection, AppError> {
    let mut opt = ConnectOptions::new(&config.database.url);

    opt.max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(true)
        .sqlx_logging_level(LevelFilter::Debug);

    Database::connect(opt)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}

/// Run pending migrations.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), AppError> {
    use sea_orm_migration::MigratorTrait;
    migrations::Migrator::up(db, None)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}

/// Whether a store error is a uniqueness (or primary key) violation.
#[must_use]
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(
        err.sql_err(),
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
    ) || err.to_string().contains("UNIQUE constraint failed")
}

/// Map an insert failure: uniqueness violations become [`AppError::Conflict`].
pub(crate) fn insert_error(err: DbErr, what: &str) -> AppError {
    if is_unique_violation(&err) {
        AppError::Conflict(format!("{what} already exists"))
    } else {
        AppError::Database(err.to_string())
    }
}
