use std::collections::HashSet;

use quiz_core::model::{ChapterFilter, Question, QuestionId};

use super::progress::SessionProgress;

/// In-memory study state for one run of the app.
///
/// Holds the active questions, the current position, the answered set, the
/// random-mode flag and the chapter filter that produced the active list.
/// `current` is only meaningful while the list is non-empty.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    questions: Vec<Question>,
    current: usize,
    answered: HashSet<QuestionId>,
    random_mode: bool,
    chapter_filter: ChapterFilter,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active questions and rewind to the first one.
    ///
    /// The answered set is keyed by global id and survives reloads.
    pub fn load(&mut self, questions: Vec<Question>) {
        self.questions = questions;
        self.current = 0;
    }

    /// Like [`load`](Self::load), also recording the filter that produced the list.
    pub fn load_filtered(&mut self, filter: ChapterFilter, questions: Vec<Question>) {
        self.chapter_filter = filter;
        self.load(questions);
    }

    /// Forget every answer and rewind to the first question.
    pub fn reset(&mut self) {
        self.answered.clear();
        self.current = 0;
    }

    /// Returns `true` when the id was not answered before, i.e. progress changed.
    pub fn mark_answered(&mut self, id: QuestionId) -> bool {
        self.answered.insert(id)
    }

    #[must_use]
    pub fn is_answered(&self, id: QuestionId) -> bool {
        self.answered.contains(&id)
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// `None` while no questions are loaded.
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        (self.current < self.questions.len()).then_some(self.current)
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    /// Move to `index`; out-of-range indices are ignored.
    pub(crate) fn set_current(&mut self, index: usize) -> bool {
        if index < self.questions.len() {
            self.current = index;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn random_mode(&self) -> bool {
        self.random_mode
    }

    pub fn set_random_mode(&mut self, on: bool) {
        self.random_mode = on;
    }

    #[must_use]
    pub fn chapter_filter(&self) -> &ChapterFilter {
        &self.chapter_filter
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answered.len()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            answered: self.answered_count(),
            total: self.len(),
        }
    }
}
