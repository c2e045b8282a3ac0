//! Test utilities for database operations.
//!
//! Every [`TestDatabase`] is a private, fully migrated in-memory `SQLite` database, so
//! tests can run in parallel without sharing state.

use std::sync::Arc;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, ExecResult,
};
use sea_orm_migration::MigratorTrait;
use tracing::debug;

use crate::migrations::Migrator;

/// In-memory database URL.
pub const MEMORY_URL: &str = "sqlite::memory:";

/// A migrated in-memory test database.
pub struct TestDatabase {
    /// Database connection, shared with the repositories under test.
    pub conn: Arc<DatabaseConnection>,
}

impl TestDatabase {
    /// Create a fresh database and run all migrations.
    ///
    /// The pool is pinned to a single connection: each `SQLite` in-memory connection
    /// owns its own database, so a second connection would see an empty schema.
    pub async fn new() -> Result<Self, DbErr> {
        let mut opt = ConnectOptions::new(MEMORY_URL);
        opt.max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;
        Migrator::up(&conn, None).await?;

        debug!("Created in-memory test database");

        Ok(Self {
            conn: Arc::new(conn),
        })
    }

    /// Get the database connection.
    #[must_use]
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Get a shared handle to the connection, as repositories expect.
    #[must_use]
    pub fn arc(&self) -> Arc<DatabaseConnection> {
        Arc::clone(&self.conn)
    }

    /// Execute raw SQL, e.g. to install a failure-injecting trigger.
    pub async fn execute(&self, sql: &str) -> Result<ExecResult, DbErr> {
        self.conn.execute_unprepared(sql).await
    }
}
