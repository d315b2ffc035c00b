//! Test utilities for database operations.
//!
//! Provides helpers for setting up and tearing down test databases. The
//! store is SQLite, so tests need no external service: each test database is
//! either in-memory or a unique throwaway file.

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::info;

/// A test database context that manages the lifecycle of a test database.
pub struct TestDatabase {
    /// Database connection.
    pub conn: DatabaseConnection,
    /// Path of the backing file, if file-based.
    path: Option<std::path::PathBuf>,
}

impl TestDatabase {
    /// Create an in-memory test database with migrations applied.
    ///
    /// The pool is limited to a single connection; SQLite in-memory
    /// databases are per-connection.
    pub async fn new() -> Result<Self, DbErr> {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).sqlx_logging(false);

        let conn = Database::connect(opt).await?;
        Self::migrate(&conn).await?;

        Ok(Self { conn, path: None })
    }

    /// Create a unique file-backed test database (for tests exercising
    /// concurrent connections).
    pub async fn create_unique() -> Result<Self, DbErr> {
        let unique = uuid::Uuid::new_v4().simple().to_string();
        let path = std::env::temp_dir().join(format!("survey_test_{unique}.db"));
        let url = format!("sqlite://{}?mode=rwc", path.display());

        let conn = Database::connect(&url).await?;
        Self::migrate(&conn).await?;

        info!(path = %path.display(), "Created unique test database");

        Ok(Self {
            conn,
            path: Some(path),
        })
    }

    async fn migrate(conn: &DatabaseConnection) -> Result<(), DbErr> {
        use sea_orm_migration::MigratorTrait;
        crate::migrations::Migrator::up(conn, None).await
    }

    /// Get the database connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Drop the test database, deleting the backing file when present.
    /// Note: This consumes self because it needs to close the connection.
    pub async fn drop_database(self) -> Result<(), DbErr> {
        self.conn.close().await?;

        if let Some(path) = self.path {
            std::fs::remove_file(&path).ok();
            info!(path = %path.display(), "Dropped test database");
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database_migrates() {
        let db = TestDatabase::new().await.unwrap();

        use sea_orm::ConnectionTrait;
        let result = db
            .connection()
            .execute(sea_orm::Statement::from_string(
                sea_orm::DatabaseBackend::Sqlite,
                "SELECT COUNT(*) FROM survey_token".to_string(),
            ))
            .await;

        assert!(result.is_ok(), "Query failed: {:?}", result.err());
    }
}
