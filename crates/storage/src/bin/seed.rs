use std::fmt;

use quiz_core::model::QuestionDraft;
use storage::repository::Storage;

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    chapters: u32,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidChapters { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidChapters { raw } => write!(f, "invalid --chapters value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("QUIZ_DB_URL")
            .unwrap_or_else(|_| "sqlite://quiz.sqlite3?mode=rwc".into());
        let mut chapters = 3;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--chapters" => {
                    let value = require_value(&mut args, "--chapters")?;
                    chapters = value
                        .parse::<u32>()
                        .map_err(|_| ArgsError::InvalidChapters { raw: value.clone() })?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { db_url, chapters })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite://quiz.sqlite3?mode=rwc)");
    eprintln!("  --chapters <n>            Number of sample chapters, at most 3 (default: 3)");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL");
    eprintln!();
    eprintln!("Seeding replaces the whole corpus.");
}

fn sample_drafts(chapters: u32) -> Vec<QuestionDraft> {
    let samples = [
        (
            "解表药",
            "1. 麻黄的主要功效是\nA.发汗解表\nB.清热泻火\nC.补气升阳",
            "答案：A",
            Some("麻黄辛温，善于发汗解表，宣肺平喘。"),
        ),
        (
            "解表药",
            "2. 简述桂枝与麻黄的配伍意义",
            "相须为用，增强发汗解表之力。",
            None,
        ),
        (
            "清热药",
            "3. 石膏煅用的功效是\nA.清热泻火\nB.收湿敛疮\nC.除烦止渴\nD.生津",
            "答案：B",
            Some("煅石膏外用收湿、生肌、敛疮、止血。"),
        ),
        (
            "补虚药",
            "4. 人参大补元气，用于\nA.气虚欲脱\nB.阴虚发热\nC.血虚萎黄\nD.阳虚水肿\nE.肝阳上亢",
            "答案：A",
            None,
        ),
    ];
    let wanted = ["解表药", "清热药", "补虚药"]
        .into_iter()
        .take(usize::try_from(chapters).unwrap_or(usize::MAX))
        .collect::<Vec<_>>();

    samples
        .into_iter()
        .filter(|(chapter, ..)| wanted.contains(chapter))
        .map(|(chapter, question, answer, analysis)| {
            let draft = QuestionDraft::new(question, answer).with_chapter(chapter);
            match analysis {
                Some(text) => draft.with_analysis(text),
                None => draft,
            }
        })
        .collect()
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = Storage::sqlite(&args.db_url).await?;

    let mut validated = Vec::new();
    for draft in sample_drafts(args.chapters) {
        validated.push(draft.validate("")?);
    }
    let count = storage.questions.replace_all(validated).await?;

    println!("Seeded {count} questions into {}", args.db_url);

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
