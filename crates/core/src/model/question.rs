use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{
    answer::{AnswerParts, compose_answer},
    format::{FormattedText, contains_option_marker, format_question_text},
    ids::QuestionId,
};

//
// ─── QUESTION TYPES ────────────────────────────────────────────────────────────
//

/// A quiz question as served by retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub chapter: String,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub is_multiple_choice: bool,
}

impl Question {
    #[must_use]
    pub fn answer_parts(&self) -> AnswerParts {
        AnswerParts::decompose(&self.answer)
    }

    #[must_use]
    pub fn formatted_text(&self) -> FormattedText {
        format_question_text(&self.question)
    }
}

/// A question as it arrives from a corpus file, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    #[serde(default)]
    pub chapter: Option<String>,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub analysis: Option<String>,
}

impl QuestionDraft {
    #[must_use]
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            chapter: None,
            question: question.into(),
            answer: answer.into(),
            analysis: None,
        }
    }

    #[must_use]
    pub fn with_chapter(mut self, chapter: impl Into<String>) -> Self {
        self.chapter = Some(chapter.into());
        self
    }

    #[must_use]
    pub fn with_analysis(mut self, analysis: impl Into<String>) -> Self {
        self.analysis = Some(analysis.into());
        self
    }

    /// Cleans and checks the draft.
    ///
    /// `fallback_chapter` is used when the draft names no chapter, usually the
    /// label derived from the source file name.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the question, answer or chapter is empty.
    pub fn validate(self, fallback_chapter: &str) -> Result<ValidatedQuestion, QuestionError> {
        let question = clean_text(&self.question);
        if question.is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }

        let (main, embedded_analysis) = {
            let parts = AnswerParts::decompose(&self.answer);
            (clean_text(parts.main_answer()), clean_text(parts.analysis()))
        };
        if main.is_empty() {
            return Err(QuestionError::EmptyAnswer);
        }
        let analysis = self
            .analysis
            .map(|extra| clean_text(&extra))
            .filter(|extra| !extra.is_empty())
            .unwrap_or(embedded_analysis);

        let chapter = self
            .chapter
            .map(|c| c.trim().to_owned())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| fallback_chapter.trim().to_owned());
        if chapter.is_empty() {
            return Err(QuestionError::MissingChapter);
        }

        let is_multiple_choice = contains_option_marker(&question);
        Ok(ValidatedQuestion {
            chapter,
            question,
            answer: compose_answer(&main, &analysis),
            is_multiple_choice,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuestion {
    pub chapter: String,
    pub question: String,
    pub answer: String,
    pub is_multiple_choice: bool,
}

impl ValidatedQuestion {
    #[must_use]
    pub fn assign_id(self, id: QuestionId) -> Question {
        Question {
            id,
            chapter: self.chapter,
            question: self.question,
            answer: self.answer,
            is_multiple_choice: self.is_multiple_choice,
        }
    }
}

//
// ─── QUESTION VALIDATION ERRORS ────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text must not be empty")]
    EmptyPrompt,

    #[error("answer text must not be empty")]
    EmptyAnswer,

    #[error("question has no chapter")]
    MissingChapter,
}

/// Trims every line and drops blank ones.
fn clean_text(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
