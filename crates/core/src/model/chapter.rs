use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::convert::Infallible;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use super::question::Question;

/// Which part of the corpus is active.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum ChapterFilter {
    #[default]
    All,
    Chapter(String),
}

impl ChapterFilter {
    pub const ALL_KEYWORD: &'static str = "all";

    #[must_use]
    pub fn chapter(name: impl Into<String>) -> Self {
        Self::Chapter(name.into())
    }

    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// The chapter constraint to hand to retrieval, if any.
    #[must_use]
    pub fn as_chapter(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Chapter(name) => Some(name.as_str()),
        }
    }

    #[must_use]
    pub fn matches(&self, question: &Question) -> bool {
        match self {
            Self::All => true,
            Self::Chapter(name) => question.chapter == *name,
        }
    }
}

impl fmt::Display for ChapterFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(Self::ALL_KEYWORD),
            Self::Chapter(name) => f.write_str(name),
        }
    }
}

impl FromStr for ChapterFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_owned()))
    }
}

impl From<String> for ChapterFilter {
    fn from(value: String) -> Self {
        if value == Self::ALL_KEYWORD {
            Self::All
        } else {
            Self::Chapter(value)
        }
    }
}

impl From<ChapterFilter> for String {
    fn from(value: ChapterFilter) -> Self {
        value.to_string()
    }
}

/// Chapter labels in order of first appearance, without duplicates.
#[must_use]
pub fn distinct_chapters(questions: &[Question]) -> Vec<String> {
    let mut seen = HashSet::new();
    questions
        .iter()
        .filter(|q| seen.insert(q.chapter.as_str()))
        .map(|q| q.chapter.clone())
        .collect()
}

/// Order-preserving subsequence of `questions` that `filter` admits.
#[must_use]
pub fn filter_by_chapter(questions: Vec<Question>, filter: &ChapterFilter) -> Vec<Question> {
    if filter.is_all() {
        return questions;
    }
    questions.into_iter().filter(|q| filter.matches(q)).collect()
}

/// Derives a chapter label from a corpus file name.
///
/// `"03 - 解表药习题答案.json"` becomes `"解表药"`: the extension goes, then
/// one trailing `习题答案`/`答案`/`习题`, then leading digits, spaces and dashes.
#[must_use]
pub fn chapter_name_from_file(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .map_or_else(|| file_name.to_owned(), |s| s.to_string_lossy().into_owned());

    let stem = ["习题答案", "答案", "习题"]
        .iter()
        .find_map(|suffix| stem.strip_suffix(suffix))
        .unwrap_or(&stem);

    stem.trim_start_matches(|c: char| c.is_ascii_digit() || c.is_whitespace() || c == '-')
        .trim()
        .to_owned()
}
