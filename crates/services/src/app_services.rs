use std::sync::Arc;

use storage::repository::Storage;

use crate::config::QuizConfig;
use crate::error::AppServicesError;
use crate::ingest::IngestService;
use crate::sessions::StudySession;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    storage: Storage,
    ingest: Arc<IngestService>,
    config: QuizConfig,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the database cannot be opened or migrated.
    pub async fn new_sqlite(config: &QuizConfig) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(&config.database_url).await?;
        Ok(Self::from_storage(storage, config.clone()))
    }

    /// Build services over an already constructed backend.
    #[must_use]
    pub fn from_storage(storage: Storage, config: QuizConfig) -> Self {
        let ingest = Arc::new(IngestService::new(
            Arc::clone(&storage.questions),
            config.ingest(),
        ));
        Self {
            storage,
            ingest,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    #[must_use]
    pub fn ingest(&self) -> Arc<IngestService> {
        Arc::clone(&self.ingest)
    }

    /// A fresh, not yet initialized study session.
    #[must_use]
    pub fn study_session(&self) -> StudySession {
        StudySession::new(Arc::clone(&self.storage.questions))
    }
}
