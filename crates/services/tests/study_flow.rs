use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use quiz_core::model::{ChapterFilter, OptionLetter, Question, ValidatedQuestion};
use services::{
    AppServices, CorpusFile, IngestError, IngestService, QuizConfig, SessionError, SessionStatus,
    StudySession,
};
use storage::repository::{InMemoryRepository, QuestionRepository, Storage, StorageError};

const JIEBIAO: &str = r#"[
    {"question": "1. 麻黄的功效是\nA.发汗解表\nB.清热泻火\nC.补气健脾", "answer": "答案：A", "analysis": "麻黄辛温发汗。"},
    {"question": "2. 简述桂枝的功效", "answer": "发汗解肌，温通经脉"}
]"#;

const QINGRE: &str = r#"[
    {"chapter": "清热药", "question": "3. 石膏\nA.补气\nB.清热泻火", "answer": "答案：B\n\n答案分析:\n石膏大寒。\n善清气分实热。"}
]"#;

fn app() -> AppServices {
    AppServices::from_storage(Storage::in_memory(), QuizConfig::default())
}

fn app_with_docs(docs: &Path) -> AppServices {
    let config = QuizConfig {
        docs_path: docs.to_path_buf(),
        ..QuizConfig::default()
    };
    AppServices::from_storage(Storage::in_memory(), config)
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("quiz-study-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

#[tokio::test]
async fn upload_study_and_filter_by_chapter() {
    let app = app();
    let ingest = app.ingest();
    let mut session = app.study_session().with_seed(3);

    let view = session.initialize().await.unwrap();
    assert_eq!(view.status, SessionStatus::Empty);

    let (report, view) = session
        .ingest_files(
            &ingest,
            vec![
                CorpusFile::new("01 解表药习题.json", JIEBIAO),
                CorpusFile::new("清热药答案.json", QINGRE),
            ],
        )
        .await
        .unwrap();
    assert_eq!(report.count, 3);
    assert!(view.is_ready());
    assert_eq!(view.chapters, vec!["解表药", "清热药"]);
    assert_eq!(view.progress.to_string(), "0 / 3");

    let question = view.question.unwrap();
    assert!(question.is_multiple_choice);
    assert_eq!(question.text.options().count(), 3);

    let view = session.select_option(OptionLetter::A);
    let reveal = view.reveal.unwrap();
    assert_eq!(reveal.main_answer(), "答案：A");
    assert_eq!(reveal.analysis_lines(), vec!["麻黄辛温发汗。"]);
    assert!(reveal.selection().unwrap().correct);
    assert_eq!(view.progress.to_string(), "1 / 3");

    let view = session
        .select_chapter(ChapterFilter::chapter("清热药"))
        .await
        .unwrap();
    assert_eq!(view.progress.total, 1);
    let question = view.question.unwrap();
    assert_eq!(question.chapter, "清热药");
    assert!(!question.is_answered);

    let view = session.reveal_answer(Some("A"));
    let reveal = view.reveal.unwrap();
    assert_eq!(reveal.correct_token(), "B");
    assert_eq!(reveal.analysis_lines(), vec!["石膏大寒。", "善清气分实热。"]);
    assert!(!reveal.selection().unwrap().correct);
    assert_eq!(view.progress.answered, 2);

    let view = session.reset();
    assert_eq!(view.progress.answered, 0);
    assert_eq!(view.chapter_filter, ChapterFilter::chapter("清热药"));
}

#[tokio::test]
async fn rejected_upload_keeps_session_state() {
    let app = app();
    let ingest = app.ingest();
    let mut session = app.study_session();

    session
        .ingest_files(&ingest, vec![CorpusFile::new("解表药.json", JIEBIAO)])
        .await
        .unwrap();
    session.reveal_answer(Some("A"));
    session.next();

    let err = session
        .ingest_files(&ingest, vec![CorpusFile::new("解表药.docx", "binary")])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::Ingestion(IngestError::UnsupportedFile { .. })
    ));

    let view = session.view();
    assert_eq!(view.progress.to_string(), "1 / 2");
    assert_eq!(view.question.unwrap().position, 1);
}

#[tokio::test]
async fn reingestion_assigns_fresh_ids() {
    let app = app();
    let ingest = app.ingest();
    let mut session = app.study_session();

    let (_, first) = session
        .ingest_files(&ingest, vec![CorpusFile::new("解表药.json", JIEBIAO)])
        .await
        .unwrap();
    session.reveal_answer(Some("A"));

    let (_, second) = session
        .ingest_files(&ingest, vec![CorpusFile::new("解表药.json", JIEBIAO)])
        .await
        .unwrap();
    let first = first.question.unwrap();
    let second_question = second.question.unwrap();
    assert!(second_question.id.value() > first.id.value());
    assert!(!second_question.is_answered);
    // Answers are keyed by id, so the old one still counts.
    assert_eq!(second.progress.to_string(), "1 / 2");
}

#[tokio::test]
async fn loading_docs_directory_refreshes_session() {
    let dir = scratch_dir("docs");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("01 解表药习题.json"), JIEBIAO).unwrap();
    fs::write(dir.join("02 清热药.json"), "[{").unwrap();

    let app = app_with_docs(&dir);
    let ingest = app.ingest();
    let mut session = app.study_session();
    assert_eq!(session.initialize().await.unwrap().status, SessionStatus::Empty);

    let (report, view) = session.load_from_path(&ingest).await.unwrap();
    assert_eq!(report.path, dir);
    assert_eq!(report.count, 2);
    assert!(view.is_ready());
    assert_eq!(view.chapters, vec!["解表药"]);
    assert_eq!(view.progress.to_string(), "0 / 2");
    assert_eq!(view.question.unwrap().position, 0);

    let _ = fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn missing_docs_directory_keeps_session_state() {
    let dir = scratch_dir("missing");
    let app = app_with_docs(&dir);
    let ingest = app.ingest();
    let mut session = app.study_session();

    session
        .ingest_files(&ingest, vec![CorpusFile::new("解表药.json", JIEBIAO)])
        .await
        .unwrap();
    session.reveal_answer(Some("A"));
    session.next();

    let err = session.load_from_path(&ingest).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Ingestion(IngestError::PathNotFound { .. })
    ));

    let view = session.view();
    assert_eq!(view.chapters, vec!["解表药"]);
    assert_eq!(view.progress.to_string(), "1 / 2");
    assert_eq!(view.question.unwrap().position, 1);
}

#[tokio::test]
async fn docs_directory_without_corpus_files_keeps_session_state() {
    let dir = scratch_dir("no-corpus");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("notes.txt"), "not a corpus").unwrap();

    let app = app_with_docs(&dir);
    let ingest = app.ingest();
    let mut session = app.study_session();
    session
        .ingest_files(&ingest, vec![CorpusFile::new("解表药.json", JIEBIAO)])
        .await
        .unwrap();
    session.next();

    let err = session.load_from_path(&ingest).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Ingestion(IngestError::NoCorpusFiles { .. })
    ));
    assert_eq!(session.view().question.unwrap().position, 1);

    let _ = fs::remove_dir_all(&dir);
}

/// Serves from an in-memory corpus until switched offline. With
/// `offline_after_write` set, every successful write switches it offline.
struct FlakyRepository {
    inner: InMemoryRepository,
    offline: AtomicBool,
    offline_after_write: bool,
}

fn flaky(offline: bool, offline_after_write: bool) -> Arc<FlakyRepository> {
    Arc::new(FlakyRepository {
        inner: InMemoryRepository::new(),
        offline: AtomicBool::new(offline),
        offline_after_write,
    })
}

#[async_trait]
impl QuestionRepository for FlakyRepository {
    async fn list_questions(&self, chapter: Option<&str>) -> Result<Vec<Question>, StorageError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StorageError::Connection("database unavailable".into()));
        }
        self.inner.list_questions(chapter).await
    }

    async fn replace_all(&self, questions: Vec<ValidatedQuestion>) -> Result<usize, StorageError> {
        let count = self.inner.replace_all(questions).await?;
        if self.offline_after_write {
            self.offline.store(true, Ordering::SeqCst);
        }
        Ok(count)
    }
}

#[tokio::test]
async fn retrieval_failure_leaves_session_untouched() {
    let repo = flaky(false, false);
    let app = app();
    let ingest = IngestService::new(repo.clone(), app.config().ingest());
    let mut session = StudySession::new(repo.clone());

    session
        .ingest_files(
            &ingest,
            vec![
                CorpusFile::new("解表药.json", JIEBIAO),
                CorpusFile::new("清热药.json", QINGRE),
            ],
        )
        .await
        .unwrap();
    session.next();
    session.reveal_answer(Some("发汗"));

    repo.offline.store(true, Ordering::SeqCst);
    let err = session
        .select_chapter(ChapterFilter::chapter("清热药"))
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Retrieval(_)));

    let view = session.view();
    assert!(view.is_ready());
    assert_eq!(view.chapter_filter, ChapterFilter::All);
    assert_eq!(view.progress.to_string(), "1 / 3");
    assert_eq!(view.question.unwrap().position, 1);
}

#[tokio::test]
async fn first_load_failure_is_shown_in_view() {
    let repo = flaky(true, false);
    let mut session = StudySession::new(repo);
    let err = session.initialize().await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "failed to load questions: connection error: database unavailable"
    );
    assert!(matches!(
        session.view().status,
        SessionStatus::RetrievalFailed { .. }
    ));
}

#[tokio::test]
async fn failed_reload_after_ingest_still_reports_count() {
    let repo = flaky(false, true);
    let ingest = IngestService::new(repo.clone(), QuizConfig::default().ingest());
    let mut session = StudySession::new(repo.clone());
    session.initialize().await.unwrap();

    let err = session
        .ingest_files(&ingest, vec![CorpusFile::new("解表药.json", JIEBIAO)])
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::RefreshAfterIngest { count: 2, .. }));
    assert_eq!(
        err.to_string(),
        "imported 2 questions, but reloading them failed: connection error: database unavailable"
    );

    repo.offline.store(false, Ordering::SeqCst);
    let view = session.refresh().await.unwrap();
    assert_eq!(view.progress.to_string(), "0 / 2");
}
