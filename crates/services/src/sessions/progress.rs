use std::fmt;

/// Answered count against the active question count, useful for UI.
///
/// `answered` counts every id answered this session, so after narrowing to a
/// chapter it can exceed `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionProgress {
    pub answered: usize,
    pub total: usize,
}

impl fmt::Display for SessionProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.answered, self.total)
    }
}
