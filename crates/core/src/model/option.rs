use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the five choice letters a multiple-choice question can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OptionLetter {
    A,
    B,
    C,
    D,
    E,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("not a choice letter (A-E): {raw:?}")]
pub struct ParseOptionError {
    raw: String,
}

impl OptionLetter {
    /// Upper-case ASCII only; `a` is not a choice letter.
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            'C' => Some(Self::C),
            'D' => Some(Self::D),
            'E' => Some(Self::E),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
        }
    }
}

impl fmt::Display for OptionLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionLetter {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c.to_ascii_uppercase()),
            _ => None,
        }
        .ok_or_else(|| ParseOptionError { raw: s.to_owned() })
    }
}
