use std::fmt;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, warn};

use quiz_core::model::{
    ChapterFilter, OptionLetter, Question, distinct_chapters, filter_by_chapter,
};
use storage::repository::{QuestionRepository, StorageError};

use super::navigator::{self, Direction};
use super::store::SessionStore;
use super::view::{AnswerReveal, QuestionView, Selection, SessionStatus, SessionView};
use crate::error::SessionError;
use crate::ingest::{CorpusFile, IngestReport, IngestService, PathIngestReport};

//
// ─── RELOAD TICKETS ────────────────────────────────────────────────────────────
//

/// Handle for one in-flight corpus reload.
///
/// Only the ticket from the most recent [`StudySession::begin_reload`] is
/// applied; older tickets are superseded and their results dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    filter: ChapterFilter,
}

impl LoadTicket {
    #[must_use]
    pub fn filter(&self) -> &ChapterFilter {
        &self.filter
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Single-user study session over a question repository.
///
/// Every mutation returns a fresh [`SessionView`] for the front-end to render.
pub struct StudySession {
    questions: Arc<dyn QuestionRepository>,
    store: SessionStore,
    chapters: Vec<String>,
    rng: StdRng,
    revealed: Option<AnswerReveal>,
    selected: Option<OptionLetter>,
    generation: u64,
    last_error: Option<String>,
}

impl StudySession {
    #[must_use]
    pub fn new(questions: Arc<dyn QuestionRepository>) -> Self {
        Self {
            questions,
            store: SessionStore::new(),
            chapters: Vec::new(),
            rng: StdRng::from_os_rng(),
            revealed: None,
            selected: None,
            generation: 0,
            last_error: None,
        }
    }

    /// Use a deterministic RNG for random navigation.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    #[must_use]
    pub fn chapters(&self) -> &[String] {
        &self.chapters
    }

    /// Fetch the full corpus. Called once when the front-end starts.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Retrieval` if the repository fails; the session
    /// keeps its previous state.
    pub async fn initialize(&mut self) -> Result<SessionView, SessionError> {
        self.reload(ChapterFilter::All).await
    }

    /// Reload the full corpus and re-derive the chapter list.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Retrieval` if the repository fails.
    pub async fn refresh(&mut self) -> Result<SessionView, SessionError> {
        self.reload(ChapterFilter::All).await
    }

    /// Narrow the session to one chapter, or widen it back to all.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Retrieval` if the repository fails.
    pub async fn select_chapter(
        &mut self,
        filter: ChapterFilter,
    ) -> Result<SessionView, SessionError> {
        self.reload(filter).await
    }

    async fn reload(&mut self, filter: ChapterFilter) -> Result<SessionView, SessionError> {
        let ticket = self.begin_reload(filter);
        let result = self
            .questions
            .list_questions(ticket.filter().as_chapter())
            .await;
        self.complete_reload(ticket, result)
    }

    /// Start a reload. Any ticket issued earlier becomes stale.
    pub fn begin_reload(&mut self, filter: ChapterFilter) -> LoadTicket {
        self.generation += 1;
        debug!(generation = self.generation, filter = %filter, "reload requested");
        LoadTicket {
            generation: self.generation,
            filter,
        }
    }

    /// Apply the retrieval result for `ticket`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Superseded` if a newer reload was started, or
    /// `SessionError::Retrieval` if the retrieval failed. Neither changes the
    /// loaded questions, the answered set or the current position.
    pub fn complete_reload(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Question>, StorageError>,
    ) -> Result<SessionView, SessionError> {
        if ticket.generation != self.generation {
            warn!(
                stale = ticket.generation,
                latest = self.generation,
                "dropping superseded reload"
            );
            return Err(SessionError::Superseded);
        }

        let questions = match result {
            Ok(questions) => questions,
            Err(err) => {
                warn!(error = %err, "question retrieval failed");
                self.last_error = Some(err.to_string());
                return Err(SessionError::Retrieval(err));
            }
        };

        let LoadTicket { filter, .. } = ticket;
        if filter.is_all() {
            self.chapters = distinct_chapters(&questions);
        }
        let questions = filter_by_chapter(questions, &filter);
        debug!(filter = %filter, count = questions.len(), "questions loaded");

        self.last_error = None;
        self.store.load_filtered(filter, questions);
        self.show_current();
        Ok(self.view())
    }

    /// Replace the corpus from uploaded files, then reload everything.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Ingestion` if the upload is rejected (the
    /// session is untouched), or `SessionError::RefreshAfterIngest` if the
    /// corpus was replaced but the reload failed.
    pub async fn ingest_files(
        &mut self,
        ingest: &IngestService,
        files: Vec<CorpusFile>,
    ) -> Result<(IngestReport, SessionView), SessionError> {
        let report = ingest.ingest_files(files).await?;
        let view = self.refresh_after_ingest(report.count).await?;
        Ok((report, view))
    }

    /// Replace the corpus from the configured directory, then reload everything.
    ///
    /// # Errors
    ///
    /// Same as [`ingest_files`](Self::ingest_files).
    pub async fn load_from_path(
        &mut self,
        ingest: &IngestService,
    ) -> Result<(PathIngestReport, SessionView), SessionError> {
        let report = ingest.ingest_from_path().await?;
        let view = self.refresh_after_ingest(report.count).await?;
        Ok((report, view))
    }

    async fn refresh_after_ingest(&mut self, count: usize) -> Result<SessionView, SessionError> {
        self.refresh().await.map_err(|err| match err {
            SessionError::Retrieval(source) => SessionError::RefreshAfterIngest { count, source },
            other => other,
        })
    }

    pub fn next(&mut self) -> SessionView {
        self.navigate(Direction::Forward)
    }

    pub fn previous(&mut self) -> SessionView {
        self.navigate(Direction::Backward)
    }

    fn navigate(&mut self, direction: Direction) -> SessionView {
        let Some(current) = self.store.current_index() else {
            return self.view();
        };
        let target = navigator::step(
            self.store.len(),
            current,
            self.store.random_mode(),
            direction,
            &mut self.rng,
        );
        if let Some(index) = target {
            self.store.set_current(index);
            self.show_current();
            debug!(?direction, from = current, to = index, "navigated");
        }
        self.view()
    }

    /// Switch random mode; turning it on jumps straight to a random question.
    pub fn set_random_mode(&mut self, on: bool) -> SessionView {
        self.store.set_random_mode(on);
        if on {
            if let Some(index) = navigator::random_jump(self.store.len(), &mut self.rng) {
                self.store.set_current(index);
                self.show_current();
            }
        }
        self.view()
    }

    /// Reveal the current answer.
    ///
    /// A non-blank `user_answer` marks the question answered and is compared
    /// against the extracted token. Without one the answer is shown but
    /// nothing is recorded.
    pub fn reveal_answer(&mut self, user_answer: Option<&str>) -> SessionView {
        let Some(question) = self.store.current_question() else {
            return self.view();
        };
        let id = question.id;
        let parts = question.answer_parts();

        let selection = user_answer
            .map(str::trim)
            .filter(|answer| !answer.is_empty())
            .map(|chosen| Selection {
                chosen: chosen.to_owned(),
                correct: parts.is_correct(chosen),
            });

        if let Some(selection) = &selection {
            if self.store.mark_answered(id) {
                debug!(%id, progress = %self.store.progress(), "progress changed");
            }
            debug!(%id, correct = selection.correct, "answer recorded");
        }

        self.revealed = Some(AnswerReveal::new(parts, selection));
        self.view()
    }

    /// Pick a choice on a multiple-choice question; reveals the answer.
    ///
    /// Ignored for open questions.
    pub fn select_option(&mut self, letter: OptionLetter) -> SessionView {
        let is_multiple_choice = self
            .store
            .current_question()
            .is_some_and(|q| q.is_multiple_choice);
        if !is_multiple_choice {
            return self.view();
        }
        self.selected = Some(letter);
        self.reveal_answer(Some(letter.as_str()))
    }

    /// Clear the answered set and go back to the first question.
    pub fn reset(&mut self) -> SessionView {
        self.store.reset();
        self.show_current();
        self.view()
    }

    /// Fresh state for the current question: answered questions show their
    /// answer right away.
    fn show_current(&mut self) {
        self.selected = None;
        self.revealed = self
            .store
            .current_question()
            .filter(|q| self.store.is_answered(q.id))
            .map(|q| AnswerReveal::new(q.answer_parts(), None));
    }

    #[must_use]
    pub fn view(&self) -> SessionView {
        let status = if !self.store.is_empty() {
            SessionStatus::Ready
        } else if let Some(message) = &self.last_error {
            SessionStatus::RetrievalFailed {
                message: message.clone(),
            }
        } else {
            SessionStatus::Empty
        };

        let question = self.store.current_question().map(|q| QuestionView {
            id: q.id,
            chapter: q.chapter.clone(),
            text: q.formatted_text(),
            is_multiple_choice: q.is_multiple_choice,
            is_answered: self.store.is_answered(q.id),
            position: self.store.current_index().unwrap_or_default(),
            selected: self.selected,
        });

        SessionView {
            status,
            question,
            reveal: self.revealed.clone(),
            progress: self.store.progress(),
            chapters: self.chapters.clone(),
            chapter_filter: self.store.chapter_filter().clone(),
            random_mode: self.store.random_mode(),
        }
    }
}

impl fmt::Debug for StudySession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudySession")
            .field("questions_len", &self.store.len())
            .field("current", &self.store.current_index())
            .field("answered", &self.store.answered_count())
            .field("random_mode", &self.store.random_mode())
            .field("chapter_filter", self.store.chapter_filter())
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
