//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use quiz_core::model::QuestionError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `IngestService`.
///
/// Display strings are shown to the user verbatim.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IngestError {
    #[error("no corpus files were provided")]
    NoFiles,
    #[error("unsupported file type: {name}")]
    UnsupportedFile { name: String },
    #[error("path does not exist: {}", path.display())]
    PathNotFound { path: PathBuf },
    #[error("no .{extension} corpus files found in {}", path.display())]
    NoCorpusFiles { path: PathBuf, extension: String },
    #[error("failed to parse {file}: {message}")]
    Parse { file: String, message: String },
    #[error("question #{index} in {file} is invalid: {source}")]
    Invalid {
        file: String,
        index: usize,
        #[source]
        source: QuestionError,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by study sessions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("failed to load questions: {0}")]
    Retrieval(#[source] StorageError),
    #[error("reload was superseded by a newer request")]
    Superseded,
    #[error("imported {count} questions, but reloading them failed: {source}")]
    RefreshAfterIngest {
        count: usize,
        #[source]
        source: StorageError,
    },
    #[error(transparent)]
    Ingestion(#[from] IngestError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
