mod parser;

use std::path::PathBuf;
use std::sync::Arc;

use storage::repository::QuestionRepository;
use tracing::{info, warn};

use crate::config::IngestConfig;
use crate::error::IngestError;

pub use parser::{CorpusFile, CorpusParser, JsonCorpusParser};

/// Outcome of an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    pub count: usize,
}

/// Outcome of loading the configured corpus directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathIngestReport {
    pub path: PathBuf,
    pub count: usize,
}

/// Replaces the question corpus from uploaded files or the configured directory.
#[derive(Clone)]
pub struct IngestService {
    questions: Arc<dyn QuestionRepository>,
    parser: Arc<dyn CorpusParser>,
    config: IngestConfig,
}

impl IngestService {
    #[must_use]
    pub fn new(questions: Arc<dyn QuestionRepository>, config: IngestConfig) -> Self {
        Self {
            questions,
            parser: Arc::new(JsonCorpusParser),
            config,
        }
    }

    #[must_use]
    pub fn with_parser(mut self, parser: Arc<dyn CorpusParser>) -> Self {
        self.parser = parser;
        self
    }

    #[must_use]
    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Parse every file and replace the corpus with the result.
    ///
    /// All files must parse; nothing is written otherwise.
    ///
    /// # Errors
    ///
    /// Returns `IngestError::NoFiles` for an empty batch,
    /// `IngestError::UnsupportedFile` for a file the parser does not accept,
    /// parse/validation errors, or `IngestError::Storage` if the write fails.
    pub async fn ingest_files(&self, files: Vec<CorpusFile>) -> Result<IngestReport, IngestError> {
        if files.is_empty() {
            return Err(IngestError::NoFiles);
        }

        let mut questions = Vec::new();
        for file in &files {
            if !self.parser.accepts(file) {
                return Err(IngestError::UnsupportedFile {
                    name: file.name.clone(),
                });
            }
            questions.extend(self.parser.parse(file)?);
        }

        let count = self.questions.replace_all(questions).await?;
        info!(files = files.len(), count, "corpus replaced from upload");
        Ok(IngestReport { count })
    }

    /// Load every corpus file in the configured directory and replace the corpus.
    ///
    /// Files that fail to read or parse are skipped.
    ///
    /// # Errors
    ///
    /// Returns `IngestError::PathNotFound` if the directory is missing,
    /// `IngestError::NoCorpusFiles` if it holds no file with the parser's
    /// extension, `IngestError::Io` if it cannot be listed, or
    /// `IngestError::Storage` if the write fails.
    pub async fn ingest_from_path(&self) -> Result<PathIngestReport, IngestError> {
        let path = self.config.docs_path.clone();
        if !tokio::fs::try_exists(&path).await? {
            return Err(IngestError::PathNotFound { path });
        }

        let mut entries = Vec::new();
        let mut dir = tokio::fs::read_dir(&path).await?;
        while let Some(entry) = dir.next_entry().await? {
            let entry_path = entry.path();
            let is_file = tokio::fs::metadata(&entry_path)
                .await
                .is_ok_and(|meta| meta.is_file());
            let matches = entry_path
                .extension()
                .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(self.parser.extension()));
            if is_file && matches {
                entries.push(entry_path);
            }
        }
        if entries.is_empty() {
            return Err(IngestError::NoCorpusFiles {
                path,
                extension: self.parser.extension().to_owned(),
            });
        }
        entries.sort();

        let mut questions = Vec::new();
        for entry in &entries {
            let parsed = match CorpusFile::read(entry).await {
                Ok(file) => self.parser.parse(&file),
                Err(err) => Err(IngestError::from(err)),
            };
            match parsed {
                Ok(parsed) => questions.extend(parsed),
                Err(err) => warn!(file = %entry.display(), error = %err, "skipping corpus file"),
            }
        }

        let count = self.questions.replace_all(questions).await?;
        info!(path = %path.display(), files = entries.len(), count, "corpus replaced from path");
        Ok(PathIngestReport { path, count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{QuestionDraft, ValidatedQuestion};
    use std::fs;
    use storage::repository::InMemoryRepository;

    /// `question|answer` per line.
    struct LineParser;

    impl CorpusParser for LineParser {
        fn extension(&self) -> &str {
            "txt"
        }

        fn parse(&self, file: &CorpusFile) -> Result<Vec<ValidatedQuestion>, IngestError> {
            let text = String::from_utf8_lossy(&file.contents);
            text.lines()
                .filter_map(|line| line.split_once('|'))
                .enumerate()
                .map(|(index, (question, answer))| {
                    QuestionDraft::new(question, answer)
                        .validate("笔记")
                        .map_err(|source| IngestError::Invalid {
                            file: file.name.clone(),
                            index: index + 1,
                            source,
                        })
                })
                .collect()
        }
    }

    fn service(repo: &InMemoryRepository, docs: impl Into<PathBuf>) -> IngestService {
        IngestService::new(Arc::new(repo.clone()), IngestConfig::new(docs))
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("quiz-ingest-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    const CORPUS: &str = r#"[
        {"question": "1. 麻黄\nA.发汗\nB.止血", "answer": "答案：A"},
        {"question": "2. 桂枝", "answer": "发汗解肌"}
    ]"#;

    #[tokio::test]
    async fn upload_replaces_corpus_with_all_files() {
        let repo = InMemoryRepository::new();
        let report = service(&repo, "unused")
            .ingest_files(vec![
                CorpusFile::new("解表药.json", CORPUS),
                CorpusFile::new("清热药.json", r#"[{"question": "3. 石膏", "answer": "清热"}]"#),
            ])
            .await
            .unwrap();
        assert_eq!(report.count, 3);

        let all = repo.list_questions(None).await.unwrap();
        let chapters: Vec<&str> = all.iter().map(|q| q.chapter.as_str()).collect();
        assert_eq!(chapters, vec!["解表药", "解表药", "清热药"]);
    }

    #[tokio::test]
    async fn empty_batch_is_rejected() {
        let repo = InMemoryRepository::new();
        let err = service(&repo, "unused").ingest_files(Vec::new()).await.unwrap_err();
        assert!(matches!(err, IngestError::NoFiles));
    }

    #[tokio::test]
    async fn unsupported_file_leaves_corpus_untouched() {
        let repo = InMemoryRepository::new();
        let svc = service(&repo, "unused");
        svc.ingest_files(vec![CorpusFile::new("解表药.json", CORPUS)])
            .await
            .unwrap();

        let err = svc
            .ingest_files(vec![
                CorpusFile::new("清热药.json", CORPUS),
                CorpusFile::new("notes.docx", "binary"),
            ])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "unsupported file type: notes.docx");
        assert_eq!(repo.list_questions(None).await.unwrap().len(), 2);
        assert_eq!(repo.list_questions(Some("解表药")).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn missing_directory_is_reported_with_path() {
        let repo = InMemoryRepository::new();
        let missing = std::env::temp_dir().join("quiz-ingest-definitely-missing");
        let err = service(&repo, &missing).ingest_from_path().await.unwrap_err();
        assert!(matches!(err, IngestError::PathNotFound { ref path } if *path == missing));
    }

    #[tokio::test]
    async fn directory_without_corpus_files_is_rejected() {
        let dir = scratch_dir("empty");
        fs::write(dir.join("readme.txt"), "nothing here").unwrap();

        let repo = InMemoryRepository::new();
        let err = service(&repo, &dir).ingest_from_path().await.unwrap_err();
        assert!(matches!(err, IngestError::NoCorpusFiles { .. }));
        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn path_load_skips_broken_files() {
        let dir = scratch_dir("mixed");
        fs::write(dir.join("01 解表药习题.json"), CORPUS).unwrap();
        fs::write(dir.join("02 broken.json"), "[{").unwrap();

        let repo = InMemoryRepository::new();
        let report = service(&repo, &dir).ingest_from_path().await.unwrap();
        assert_eq!(report.path, dir);
        assert_eq!(report.count, 2);

        let all = repo.list_questions(None).await.unwrap();
        assert!(all.iter().all(|q| q.chapter == "解表药"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn custom_parser_sets_accepted_extension() {
        let dir = scratch_dir("custom");
        fs::write(dir.join("notes.txt"), "1. 麻黄|发汗\n2. 石膏|清热\n").unwrap();
        fs::write(dir.join("解表药.json"), CORPUS).unwrap();

        let repo = InMemoryRepository::new();
        let svc = service(&repo, &dir).with_parser(Arc::new(LineParser));
        let report = svc.ingest_from_path().await.unwrap();
        assert_eq!(report.count, 2);
        assert!(repo.list_questions(None).await.unwrap().iter().all(|q| q.chapter == "笔记"));

        let err = svc
            .ingest_files(vec![CorpusFile::new("解表药.json", CORPUS)])
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedFile { .. }));
        let _ = fs::remove_dir_all(&dir);
    }
}
