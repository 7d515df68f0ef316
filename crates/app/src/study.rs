use std::path::PathBuf;

use quiz_core::model::{ChapterFilter, OptionLetter};
use services::{AppServices, CorpusFile, SessionError, SessionView, StudySession};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::render::{render_chapters, render_view};

const HELP: &str = "\
Commands:
  n, next              next question
  p, prev              previous question
  a..e                 pick an option (multiple choice)
  r, reveal [answer]   show the answer, recording it when given
  random on|off        toggle random order
  chapters             list chapters
  chapter <name|all>   study one chapter or all of them
  reset                clear progress and start over
  ingest <file>...     replace the corpus from files
  load                 replace the corpus from the docs directory
  refresh              reload questions
  h, help              show this help
  q, quit              exit";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Next,
    Previous,
    Pick(OptionLetter),
    Reveal(Option<String>),
    Random(bool),
    Chapters,
    Chapter(ChapterFilter),
    Reset,
    Ingest(Vec<PathBuf>),
    Load,
    Refresh,
    Help,
    Quit,
}

impl Input {
    /// Parse a command line; `Err` carries the message to print.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        let (head, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(head, rest)| (head, rest.trim()));

        let input = match head {
            "" => return Ok(None),
            "n" | "next" => Self::Next,
            "p" | "prev" | "previous" => Self::Previous,
            "r" | "reveal" => Self::Reveal((!rest.is_empty()).then(|| rest.to_owned())),
            "random" => match rest {
                "on" => Self::Random(true),
                "off" => Self::Random(false),
                _ => return Err("usage: random on|off".into()),
            },
            "chapters" => Self::Chapters,
            "chapter" if rest.is_empty() => return Err("usage: chapter <name|all>".into()),
            "chapter" => Self::Chapter(ChapterFilter::from(rest.to_owned())),
            "reset" => Self::Reset,
            "ingest" if rest.is_empty() => return Err("usage: ingest <file>...".into()),
            "ingest" => Self::Ingest(rest.split_whitespace().map(PathBuf::from).collect()),
            "load" => Self::Load,
            "refresh" => Self::Refresh,
            "h" | "help" | "?" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            other => match other.parse::<OptionLetter>() {
                Ok(letter) if rest.is_empty() => Self::Pick(letter),
                _ => return Err(format!("unknown command: {other} (try `help`)")),
            },
        };
        Ok(Some(input))
    }
}

/// Interactive loop over stdin until `quit` or end of input.
pub async fn run(services: &AppServices) -> Result<(), Box<dyn std::error::Error>> {
    let ingest = services.ingest();
    let mut session = services.study_session();

    match session.initialize().await {
        Ok(view) => println!("{}", render_view(&view)),
        Err(err) => {
            eprintln!("{err}");
            println!("{}", render_view(&session.view()));
        }
    }
    println!("Type `help` for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = match Input::parse(&line) {
            Ok(Some(input)) => input,
            Ok(None) => continue,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };
        debug!(?input, "command");

        let view = match input {
            Input::Quit => break,
            Input::Help => {
                println!("{HELP}");
                continue;
            }
            Input::Chapters => {
                print!("{}", render_chapters(&session.view()));
                continue;
            }
            Input::Next => Some(session.next()),
            Input::Previous => Some(session.previous()),
            Input::Pick(letter) => pick(&mut session, letter),
            Input::Reveal(answer) => Some(session.reveal_answer(answer.as_deref())),
            Input::Random(on) => Some(session.set_random_mode(on)),
            Input::Reset => Some(session.reset()),
            Input::Chapter(filter) => report(session.select_chapter(filter).await),
            Input::Refresh => report(session.refresh().await),
            Input::Ingest(paths) => match read_files(&paths).await {
                Ok(files) => match session.ingest_files(&ingest, files).await {
                    Ok((result, view)) => {
                        println!("Ingested {} questions.", result.count);
                        Some(view)
                    }
                    Err(err) => report(Err(err)),
                },
                Err(err) => {
                    eprintln!("{err}");
                    None
                }
            },
            Input::Load => match session.load_from_path(&ingest).await {
                Ok((result, view)) => {
                    println!(
                        "Loaded {} questions from {}.",
                        result.count,
                        result.path.display()
                    );
                    Some(view)
                }
                Err(err) => report(Err(err)),
            },
        }
        .unwrap_or_else(|| session.view());

        println!("{}", render_view(&view));
    }
    Ok(())
}

fn pick(session: &mut StudySession, letter: OptionLetter) -> Option<SessionView> {
    let is_choice = session
        .store()
        .current_question()
        .is_some_and(|q| q.is_multiple_choice);
    if !is_choice {
        eprintln!("The current question has no options; use `reveal <answer>`.");
        return None;
    }
    Some(session.select_option(letter))
}

fn report(result: Result<SessionView, SessionError>) -> Option<SessionView> {
    match result {
        Ok(view) => Some(view),
        Err(err) => {
            eprintln!("{err}");
            None
        }
    }
}

pub async fn read_files(paths: &[PathBuf]) -> std::io::Result<Vec<CorpusFile>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        files.push(CorpusFile::read(path).await?);
    }
    Ok(files)
}
