use async_trait::async_trait;
use quiz_core::model::{Question, QuestionId, ValidatedQuestion};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for the question corpus.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// List questions ordered by id, optionally restricted to one chapter.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the corpus cannot be read.
    async fn list_questions(&self, chapter: Option<&str>) -> Result<Vec<Question>, StorageError>;

    /// Replace the whole corpus, assigning fresh ids in input order.
    ///
    /// Ids are never reused: questions inserted after a replacement get ids
    /// greater than any id handed out before. Returns the number inserted.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the corpus cannot be written. The previous
    /// corpus is kept on failure.
    async fn replace_all(&self, questions: Vec<ValidatedQuestion>) -> Result<usize, StorageError>;
}

#[derive(Default)]
struct Corpus {
    questions: Vec<Question>,
    last_id: u64,
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    corpus: Arc<Mutex<Corpus>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn list_questions(&self, chapter: Option<&str>) -> Result<Vec<Question>, StorageError> {
        let guard = self
            .corpus
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .questions
            .iter()
            .filter(|q| chapter.is_none_or(|c| q.chapter == c))
            .cloned()
            .collect())
    }

    async fn replace_all(&self, questions: Vec<ValidatedQuestion>) -> Result<usize, StorageError> {
        let mut guard = self
            .corpus
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut next = guard.last_id;
        let replaced: Vec<Question> = questions
            .into_iter()
            .map(|q| {
                next += 1;
                q.assign_id(QuestionId::new(next))
            })
            .collect();
        let count = replaced.len();
        guard.questions = replaced;
        guard.last_id = next;
        Ok(count)
    }
}

/// Bundles the question repository behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let questions: Arc<dyn QuestionRepository> = Arc::new(InMemoryRepository::new());
        Self { questions }
    }
}
