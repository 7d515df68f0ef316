#![forbid(unsafe_code)]

pub mod app_services;
pub mod config;
pub mod error;
pub mod ingest;
pub mod sessions;

pub use app_services::AppServices;
pub use config::{IngestConfig, QuizConfig};
pub use error::{AppServicesError, IngestError, SessionError};
pub use ingest::{
    CorpusFile, CorpusParser, IngestReport, IngestService, JsonCorpusParser, PathIngestReport,
};
pub use sessions::{
    AnswerReveal, LoadTicket, QuestionView, Selection, SessionProgress, SessionStatus,
    SessionStore, SessionView, StudySession,
};
