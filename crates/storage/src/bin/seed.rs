use std::fmt;

use chrono::{DateTime, Utc};

use academy_core::engine;
use academy_core::model::{Difficulty, LearningPath, Module, PathId, PathProgress, Section};
use storage::repository::Storage;
use storage::store::ProgressStore;

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    namespace: String,
    complete_through: usize,
    now: Option<DateTime<Utc>>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidCompleteThrough { raw: String },
    InvalidNow { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidCompleteThrough { raw } => {
                write!(f, "invalid --complete-through value: {raw}")
            }
            ArgsError::InvalidNow { raw } => {
                write!(f, "invalid --now value (expected RFC3339): {raw}")
            }
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
        let mut db_url =
            std::env::var("ACADEMY_DB_URL").unwrap_or_else(|_| "sqlite:dev.sqlite3".into());
        let mut namespace =
            std::env::var("ACADEMY_NAMESPACE").unwrap_or_else(|_| "progress".into());
        let mut complete_through = std::env::var("ACADEMY_COMPLETE_THROUGH")
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .unwrap_or(2);
        let mut now: Option<DateTime<Utc>> = None;

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
                "--namespace" => {
                    let value = require_value(&mut args, "--namespace")?;
                    namespace = value;
                }
                "--complete-through" => {
                    let value = require_value(&mut args, "--complete-through")?;
                    complete_through = value
                        .parse::<usize>()
                        .map_err(|_| ArgsError::InvalidCompleteThrough { raw: value.clone() })?;
                }
                "--now" => {
                    let value = require_value(&mut args, "--now")?;
                    let parsed = DateTime::parse_from_rfc3339(&value)
                        .map_err(|_| ArgsError::InvalidNow { raw: value.clone() })?
                        .with_timezone(&Utc);
                    now = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            namespace,
            complete_through,
            now,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite:dev.sqlite3)");
    eprintln!("  --namespace <ns>          Progress key namespace (default: progress)");
    eprintln!("  --complete-through <n>    Sections to mark complete, in path order (default: 2)");
    eprintln!("  --now <rfc3339>           Fixed current time for deterministic seeding");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  ACADEMY_DB_URL, ACADEMY_NAMESPACE, ACADEMY_COMPLETE_THROUGH");
}

fn demo_path() -> Result<LearningPath, Box<dyn std::error::Error>> {
    let fundamentals = Module::new(
        "bitcoin-fundamentals",
        "Bitcoin Fundamentals",
        Difficulty::Beginner,
        vec![
            Section::new(
                "what-is-bitcoin",
                "What is Bitcoin?",
                Some("Money without an issuer, and why that matters.".into()),
                3,
            )?,
            Section::new(
                "the-blockchain",
                "The Blockchain",
                Some("Blocks, hashes, and the longest chain.".into()),
                3,
            )?,
            Section::new(
                "proof-of-work",
                "Proof of Work",
                Some("Mining, difficulty, and the 21 million cap.".into()),
                2,
            )?,
        ],
    )?;

    let practice = Module::new(
        "bitcoin-in-practice",
        "Bitcoin in Practice",
        Difficulty::Intermediate,
        vec![
            Section::new(
                "wallets-and-keys",
                "Wallets and Keys",
                Some("Seed phrases, private keys, and custody.".into()),
                3,
            )?,
            Section::new(
                "running-a-node",
                "Running a Node",
                Some("Verifying the chain yourself.".into()),
                0,
            )?,
        ],
    )?;

    Ok(LearningPath::new("bitcoin", "Bitcoin", vec![fundamentals, practice])?)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = Storage::sqlite(&args.db_url).await?;
    let store = ProgressStore::new(storage.progress).with_namespace(args.namespace);
    let now = args.now.unwrap_or_else(Utc::now);

    let path = demo_path()?;
    let path_id = PathId::new(path.id().as_str());

    let mut progress = PathProgress::new();
    let refs: Vec<_> = path
        .section_refs()
        .map(|(module, section)| {
            (
                module.id().clone(),
                section.id().clone(),
                section.checkbox_count(),
            )
        })
        .collect();

    let completed = args.complete_through.min(refs.len());
    for (module_id, section_id, checkbox_count) in refs.iter().take(completed) {
        progress
            .ensure_section(module_id, section_id, *checkbox_count)
            .mark_complete(now);
        if engine::module_is_complete(&path, &progress, module_id) {
            if let Some(module) = progress.module_mut(module_id) {
                module.stamp_completed(now);
            }
        }
    }

    store.save(&path_id, &progress).await;

    println!(
        "Seeded path {} with {}/{} sections complete into {}",
        path_id,
        completed,
        refs.len(),
        args.db_url
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
