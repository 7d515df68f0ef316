use std::env;
use std::path::PathBuf;

/// Runtime configuration shared by the binary and the services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizConfig {
    pub database_url: String,
    /// Directory scanned by path-based ingestion.
    pub docs_path: PathBuf,
}

impl QuizConfig {
    pub const DEFAULT_DATABASE_URL: &'static str = "sqlite://quiz.sqlite3";
    pub const DEFAULT_DOCS_PATH: &'static str = "docs";

    /// Reads `QUIZ_DB_URL` and `QUIZ_DOCS_PATH`, falling back to defaults for
    /// unset or blank values.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            database_url: non_blank("QUIZ_DB_URL")
                .unwrap_or_else(|| Self::DEFAULT_DATABASE_URL.into()),
            docs_path: non_blank("QUIZ_DOCS_PATH")
                .map_or_else(|| PathBuf::from(Self::DEFAULT_DOCS_PATH), PathBuf::from),
        }
    }

    #[must_use]
    pub fn ingest(&self) -> IngestConfig {
        IngestConfig {
            docs_path: self.docs_path.clone(),
        }
    }
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Settings for `IngestService`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestConfig {
    pub docs_path: PathBuf,
}

impl IngestConfig {
    #[must_use]
    pub fn new(docs_path: impl Into<PathBuf>) -> Self {
        Self {
            docs_path: docs_path.into(),
        }
    }
}
