use std::fmt::Write as _;

use quiz_core::model::FormattedLine;
use services::{SessionStatus, SessionView};

pub const EMPTY_PROMPT: &str =
    "No questions loaded. Use `ingest <file>...` or `load` to provide a corpus.";

/// Plain-text rendering of a session snapshot.
pub fn render_view(view: &SessionView) -> String {
    let mut out = String::new();
    let mode = if view.random_mode { "random" } else { "sequential" };
    let _ = writeln!(
        out,
        "[{}] chapter: {} | mode: {mode} | progress: {}",
        status_label(&view.status),
        view.chapter_filter,
        view.progress,
    );

    match &view.status {
        SessionStatus::Empty => {
            let _ = writeln!(out, "{EMPTY_PROMPT}");
            return out;
        }
        SessionStatus::RetrievalFailed { message } => {
            let _ = writeln!(out, "Could not load questions: {message}");
            return out;
        }
        SessionStatus::Ready => {}
    }

    if let Some(question) = &view.question {
        let answered = if question.is_answered { " (answered)" } else { "" };
        let _ = writeln!(
            out,
            "#{} of {} [{}]{answered}",
            question.position + 1,
            view.progress.total,
            question.chapter,
        );
        for line in &question.text.lines {
            match line {
                FormattedLine::Text(text) => {
                    let _ = writeln!(out, "{text}");
                }
                FormattedLine::Option {
                    letter,
                    label,
                    content,
                } => {
                    let cursor = if question.selected == Some(*letter) { ">" } else { " " };
                    let _ = writeln!(out, "{cursor} {label}{content}");
                }
            }
        }
    }

    if let Some(reveal) = &view.reveal {
        let _ = writeln!(out, "---");
        let _ = writeln!(out, "{}", reveal.main_answer());
        let analysis = reveal.analysis_lines();
        if !analysis.is_empty() {
            let _ = writeln!(out, "Analysis:");
            for line in analysis {
                let _ = writeln!(out, "  {line}");
            }
        }
        if let Some(selection) = reveal.selection() {
            let _ = writeln!(out, "Your answer: {}", selection.chosen);
        }
    }
    out
}

fn status_label(status: &SessionStatus) -> &'static str {
    match status {
        SessionStatus::Ready => "ready",
        SessionStatus::Empty => "empty",
        SessionStatus::RetrievalFailed { .. } => "error",
    }
}

pub fn render_chapters(view: &SessionView) -> String {
    let mut out = String::from("Chapters:\n");
    let marker = |active: bool| if active { "*" } else { " " };
    let _ = writeln!(out, "{} all", marker(view.chapter_filter.is_all()));
    for chapter in &view.chapters {
        let active = view.chapter_filter.as_chapter() == Some(chapter.as_str());
        let _ = writeln!(out, "{} {chapter}", marker(active));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use quiz_core::model::{OptionLetter, QuestionDraft};
    use services::StudySession;
    use storage::repository::{InMemoryRepository, QuestionRepository};

    async fn session() -> StudySession {
        let repo = InMemoryRepository::new();
        let question = QuestionDraft::new("1. 麻黄的功效\nA.发汗\nB.止血", "答案：A")
            .with_chapter("解表药")
            .with_analysis("辛温发散\n宣肺平喘")
            .validate("")
            .unwrap();
        repo.replace_all(vec![question]).await.unwrap();
        let mut session = StudySession::new(Arc::new(repo));
        session.initialize().await.unwrap();
        session
    }

    #[tokio::test]
    async fn renders_question_and_options() {
        let session = session().await;
        let text = render_view(&session.view());
        assert!(text.starts_with("[ready] chapter: all | mode: sequential | progress: 0 / 1\n"));
        assert!(text.contains("#1 of 1 [解表药]\n1. 麻黄的功效\n  A.发汗\n  B.止血\n"));
        assert!(!text.contains("---"));
    }

    #[tokio::test]
    async fn renders_reveal_with_selection() {
        let mut session = session().await;
        let text = render_view(&session.select_option(OptionLetter::B));
        assert!(text.contains("> B.止血"));
        assert!(text.contains("(answered)"));
        assert!(text.contains("---\n答案：A\nAnalysis:\n  辛温发散\n  宣肺平喘\nYour answer: B\n"));
    }

    #[tokio::test]
    async fn empty_corpus_prompts_for_ingestion() {
        let mut session = StudySession::new(Arc::new(InMemoryRepository::new()));
        let view = session.initialize().await.unwrap();
        assert!(render_view(&view).contains(EMPTY_PROMPT));
    }

    #[tokio::test]
    async fn chapter_list_marks_active_filter() {
        let session = session().await;
        assert_eq!(render_chapters(&session.view()), "Chapters:\n* all\n  解表药\n");
    }
}
