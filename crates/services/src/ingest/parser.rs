use std::io;
use std::path::Path;

use quiz_core::model::{QuestionDraft, ValidatedQuestion, chapter_name_from_file};

use crate::error::IngestError;

/// One uploaded corpus file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusFile {
    pub name: String,
    pub contents: Vec<u8>,
}

impl CorpusFile {
    #[must_use]
    pub fn new(name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }

    /// Read a file from disk, keeping only its file name.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the file cannot be read.
    pub async fn read(path: &Path) -> io::Result<Self> {
        let contents = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Ok(Self { name, contents })
    }

    /// Lower-cased extension, if the name has one.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
    }
}

/// Turns corpus files into validated questions.
pub trait CorpusParser: Send + Sync {
    /// File extension (without the dot) this parser accepts.
    fn extension(&self) -> &str;

    /// Parse one file.
    ///
    /// # Errors
    ///
    /// Returns `IngestError::Parse` for unreadable content and
    /// `IngestError::Invalid` for questions that fail validation.
    fn parse(&self, file: &CorpusFile) -> Result<Vec<ValidatedQuestion>, IngestError>;

    fn accepts(&self, file: &CorpusFile) -> bool {
        file.extension().as_deref() == Some(self.extension())
    }
}

/// Reads a JSON array of question drafts.
///
/// Drafts without a chapter take the chapter derived from the file name.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCorpusParser;

impl CorpusParser for JsonCorpusParser {
    fn extension(&self) -> &str {
        "json"
    }

    fn parse(&self, file: &CorpusFile) -> Result<Vec<ValidatedQuestion>, IngestError> {
        let drafts: Vec<QuestionDraft> =
            serde_json::from_slice(&file.contents).map_err(|e| IngestError::Parse {
                file: file.name.clone(),
                message: e.to_string(),
            })?;

        let fallback_chapter = chapter_name_from_file(&file.name);
        drafts
            .into_iter()
            .enumerate()
            .map(|(index, draft)| {
                draft
                    .validate(&fallback_chapter)
                    .map_err(|source| IngestError::Invalid {
                        file: file.name.clone(),
                        index: index + 1,
                        source,
                    })
            })
            .collect()
    }
}
