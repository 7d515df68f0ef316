mod render;
mod study;

use std::fmt;
use std::path::PathBuf;

use services::{AppServices, QuizConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    NoInputFiles,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::NoInputFiles => write!(f, "ingest requires at least one file"),
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

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  app [study]            [--db <sqlite_url>] [--docs <dir>]");
    eprintln!("  app ingest <file>...   [--db <sqlite_url>]");
    eprintln!("  app load-path          [--db <sqlite_url>] [--docs <dir>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {}", QuizConfig::DEFAULT_DATABASE_URL);
    eprintln!("  --docs {}", QuizConfig::DEFAULT_DOCS_PATH);
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_DOCS_PATH, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Study,
    Ingest,
    LoadPath,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "study" => Some(Self::Study),
            "ingest" => Some(Self::Ingest),
            "load-path" => Some(Self::LoadPath),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Args {
    config: QuizConfig,
    files: Vec<PathBuf>,
}

impl Args {
    fn parse(
        cmd: Command,
        args: &mut impl Iterator<Item = String>,
        mut config: QuizConfig,
    ) -> Result<Self, ArgsError> {
        config.database_url = normalize_sqlite_url(config.database_url);
        let mut files = Vec::new();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    config.database_url = normalize_sqlite_url(value);
                }
                "--docs" => {
                    config.docs_path = PathBuf::from(require_value(args, "--docs")?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ if cmd == Command::Ingest && !arg.starts_with("--") => {
                    files.push(PathBuf::from(arg));
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        if cmd == Command::Ingest && files.is_empty() {
            return Err(ArgsError::NoInputFiles);
        }
        Ok(Self { config, files })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand means an interactive study session.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Study,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Study,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(cmd, &mut iter, QuizConfig::from_env()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&parsed.config.database_url)?;
    let services = AppServices::new_sqlite(&parsed.config).await?;
    info!(db = %parsed.config.database_url, "storage ready");

    match cmd {
        Command::Study => study::run(&services).await,
        Command::Ingest => {
            let files = study::read_files(&parsed.files).await?;
            let report = services.ingest().ingest_files(files).await?;
            println!("Ingested {} questions.", report.count);
            Ok(())
        }
        Command::LoadPath => {
            let report = services.ingest().ingest_from_path().await?;
            println!(
                "Loaded {} questions from {}.",
                report.count,
                report.path.display()
            );
            Ok(())
        }
    }
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
