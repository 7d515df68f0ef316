use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

use crate::repository::{QuestionRepository, Storage};

mod mapping;
mod migrate;
mod question_repo;

const MAX_CONNECTIONS: u32 = 5;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Question corpus stored in one `SQLite` database.
#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteInitError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl SqliteRepository {
    /// Open a small pool on `database_url` in WAL mode.
    ///
    /// Corpus replacement holds a write transaction while every question is
    /// inserted, so readers wait on the busy timeout instead of failing.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the database cannot be opened.
    pub async fn connect(database_url: &str) -> Result<Self, SqliteInitError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(BUSY_TIMEOUT)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// Bring the `questions` schema up to date. Safe to call on every start.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if a migration statement fails.
    pub async fn migrate(&self) -> Result<(), SqliteInitError> {
        migrate::run_migrations(&self.pool).await
    }
}

impl Storage {
    /// Connect, migrate and wrap the repository for the services layer.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the database cannot be opened or migrated.
    pub async fn sqlite(database_url: &str) -> Result<Self, SqliteInitError> {
        let repo = SqliteRepository::connect(database_url).await?;
        repo.migrate().await?;
        let questions: Arc<dyn QuestionRepository> = Arc::new(repo);
        Ok(Self { questions })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SqliteRepository>();
    }

    #[tokio::test]
    async fn connections_wait_on_busy_database() {
        let repo = SqliteRepository::connect("sqlite:file:memdb_busy?mode=memory&cache=shared")
            .await
            .unwrap();
        let timeout: i64 = sqlx::query_scalar("PRAGMA busy_timeout")
            .fetch_one(&repo.pool)
            .await
            .unwrap();
        assert_eq!(timeout, 5000);
    }
}
