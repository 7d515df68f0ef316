use quiz_core::model::{AnswerParts, ChapterFilter, FormattedText, OptionLetter, QuestionId};

use super::progress::SessionProgress;

/// What the question area should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Ready,
    /// Retrieval worked but there is nothing to study; prompt for ingestion.
    Empty,
    /// Retrieval failed and nothing was loaded before.
    RetrievalFailed { message: String },
}

/// The user's selection against the extracted answer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub chosen: String,
    pub correct: bool,
}

/// Revealed answer panel for the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerReveal {
    parts: AnswerParts,
    selection: Option<Selection>,
}

impl AnswerReveal {
    pub(crate) fn new(parts: AnswerParts, selection: Option<Selection>) -> Self {
        Self { parts, selection }
    }

    #[must_use]
    pub fn main_answer(&self) -> &str {
        self.parts.main_answer()
    }

    #[must_use]
    pub fn analysis_lines(&self) -> Vec<&str> {
        self.parts.analysis_lines()
    }

    #[must_use]
    pub fn correct_token(&self) -> &str {
        self.parts.correct_token()
    }

    /// Present only when the reveal came with a user answer.
    #[must_use]
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub id: QuestionId,
    pub chapter: String,
    pub text: FormattedText,
    pub is_multiple_choice: bool,
    pub is_answered: bool,
    /// Zero-based index into the active questions.
    pub position: usize,
    pub selected: Option<OptionLetter>,
}

/// Snapshot of everything the front-end renders after a state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub status: SessionStatus,
    pub question: Option<QuestionView>,
    pub reveal: Option<AnswerReveal>,
    pub progress: SessionProgress,
    pub chapters: Vec<String>,
    pub chapter_filter: ChapterFilter,
    pub random_mode: bool,
}

impl SessionView {
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.status == SessionStatus::Ready
    }
}
