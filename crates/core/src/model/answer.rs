//! Answer text decomposition.
//!
//! Raw answers look like:
//!
//! ```text
//! 答案：B
//!
//! 答案分析:
//! free-form analysis...
//! ```
//!
//! Grammar:
//! - `answer  := main (MARKER analysis)?`
//! - `MARKER  := "\n\n答案分析:\n"`
//! - `token   := PREFIX SEP ws* [A-E]`, matched at the start of the raw text
//! - `PREFIX  := "答案"`, `SEP := ":" | "："`
//!
//! When no token matches, the first raw line (with `PREFIX SEP ws*` stripped)
//! is the token. None of this fails: unexpected input degrades to "whole text
//! is the answer".

use serde::Serialize;

use super::option::OptionLetter;

/// Separates the canonical answer from its analysis.
pub const ANALYSIS_MARKER: &str = "\n\n答案分析:\n";

/// Leading label of an answer line.
pub const ANSWER_PREFIX: &str = "答案";

const PREFIX_SEPARATORS: [char; 2] = [':', '：'];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerParts {
    main_answer: String,
    analysis: String,
    correct_token: String,
}

impl AnswerParts {
    #[must_use]
    pub fn decompose(raw: &str) -> Self {
        let (main_answer, analysis) = match raw.split_once(ANALYSIS_MARKER) {
            Some((main, analysis)) => (main.to_owned(), analysis.to_owned()),
            None => (raw.to_owned(), String::new()),
        };
        Self {
            main_answer,
            analysis,
            correct_token: correct_token(raw),
        }
    }

    #[must_use]
    pub fn main_answer(&self) -> &str {
        &self.main_answer
    }

    /// Empty when the raw answer has no analysis marker.
    #[must_use]
    pub fn analysis(&self) -> &str {
        &self.analysis
    }

    #[must_use]
    pub fn has_analysis(&self) -> bool {
        !self.analysis.is_empty()
    }

    /// Analysis split on every newline, for display.
    #[must_use]
    pub fn analysis_lines(&self) -> Vec<&str> {
        if self.analysis.is_empty() {
            return Vec::new();
        }
        self.analysis.split('\n').collect()
    }

    #[must_use]
    pub fn correct_token(&self) -> &str {
        &self.correct_token
    }

    /// Exact comparison of a user selection against the extracted token.
    #[must_use]
    pub fn is_correct(&self, selected: &str) -> bool {
        self.correct_token == selected
    }

    /// The token as a choice letter, when it is one.
    #[must_use]
    pub fn correct_letter(&self) -> Option<OptionLetter> {
        let mut chars = self.correct_token.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => OptionLetter::from_char(c),
            _ => None,
        }
    }
}

/// Rebuilds raw answer text from its parts; the inverse of
/// [`AnswerParts::decompose`] for the main answer and analysis.
#[must_use]
pub fn compose_answer(main_answer: &str, analysis: &str) -> String {
    if analysis.is_empty() {
        main_answer.to_owned()
    } else {
        format!("{main_answer}{ANALYSIS_MARKER}{analysis}")
    }
}

/// Strips `答案` + `:`/`：` + whitespace from the start of `text`.
fn strip_answer_prefix(text: &str) -> Option<&str> {
    let rest = text.strip_prefix(ANSWER_PREFIX)?;
    let rest = rest.strip_prefix(PREFIX_SEPARATORS)?;
    Some(rest.trim_start())
}

fn correct_token(raw: &str) -> String {
    let letter = strip_answer_prefix(raw)
        .and_then(|rest| rest.chars().next())
        .and_then(OptionLetter::from_char);
    if let Some(letter) = letter {
        return letter.as_str().to_owned();
    }

    let first_line = raw.split('\n').next().unwrap_or(raw);
    strip_answer_prefix(first_line)
        .unwrap_or(first_line)
        .to_owned()
}
