use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Schema definition, kept as a standalone SQL file next to the crate.
pub const SCHEMA_SQL: &str = include_str!("../../db/items.sql");

const DATABASE_FILE: &str = "catalog.sqlite3";

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Owned handle to the catalog connection pool. Cloning shares the pool.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open or create the catalog in `data_dir` and bootstrap the schema.
    pub async fn open<P: AsRef<Path>>(
        data_dir: P,
        max_connections: u32,
    ) -> Result<Self, DatabaseError> {
        std::fs::create_dir_all(data_dir.as_ref())?;
        let db_path = data_dir.as_ref().join(DATABASE_FILE);

        let opts = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(opts)
            .await?;

        let db = Self { pool };
        db.migrate().await?;

        tracing::debug!(path = %db_path.display(), "Catalog database ready");
        Ok(db)
    }

    /// Apply the schema. Every statement is create-if-absent, so re-running is harmless.
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        sqlx::raw_sql(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
