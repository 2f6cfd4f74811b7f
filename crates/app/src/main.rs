use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use prep_core::model::CollectionName;
use prep_core::parse_batch;
use services::{AppServices, Clock, QuestionApi, QuestionApiConfig, StaticCredentials};
use ui::{APP_TITLE, App, UiApp, build_app_context};

const DEFAULT_DB_URL: &str = "sqlite://prep.sqlite3";
const DEFAULT_LOG_FILTER: &str = "app=info,services=info,storage=info";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingFlag { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidTimeout { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingFlag { flag } => write!(f, "{flag} is required"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidTimeout { raw } => write!(f, "invalid --timeout value: {raw}"),
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
    eprintln!("  cargo run -p app -- ui     [--db <sqlite_url>] [--api <url>] [--timeout <secs>]");
    eprintln!(
        "  cargo run -p app -- import --collection <name> --file <path> --as <username> [--api <url>]"
    );
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --api {}", services::question_api::DEFAULT_API_URL);
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  PREP_DB_URL, PREP_API_URL, PREP_API_TIMEOUT_SECS, PREP_USERS, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Import,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "import" => Some(Self::Import),
            _ => None,
        }
    }
}

struct UiArgs {
    db_url: String,
    api: QuestionApiConfig,
}

struct ImportArgs {
    api: QuestionApiConfig,
    collection: CollectionName,
    file: std::path::PathBuf,
    created_by: String,
}

/// Apply the flags shared by every command; returns `false` when `arg` is
/// not one of them.
fn parse_api_flag(
    arg: &str,
    args: &mut impl Iterator<Item = String>,
    api: &mut QuestionApiConfig,
) -> Result<bool, ArgsError> {
    match arg {
        "--api" => {
            api.base_url = require_value(args, "--api")?;
            Ok(true)
        }
        "--timeout" => {
            let value = require_value(args, "--timeout")?;
            let secs: u64 = value
                .trim()
                .parse()
                .map_err(|_| ArgsError::InvalidTimeout { raw: value.clone() })?;
            api.timeout = Duration::from_secs(secs);
            Ok(true)
        }
        "--help" | "-h" => {
            print_usage();
            std::process::exit(0);
        }
        _ => Ok(false),
    }
}

impl UiArgs {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("PREP_DB_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url);
        let mut api = QuestionApiConfig::from_env();

        while let Some(arg) = args.next() {
            if parse_api_flag(&arg, args, &mut api)? {
                continue;
            }
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { db_url, api })
    }
}

impl ImportArgs {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut api = QuestionApiConfig::from_env();
        let mut collection = None;
        let mut file = None;
        let mut created_by = None;

        while let Some(arg) = args.next() {
            if parse_api_flag(&arg, args, &mut api)? {
                continue;
            }
            match arg.as_str() {
                "--collection" => {
                    collection = Some(CollectionName::new(require_value(args, "--collection")?));
                }
                "--file" => file = Some(require_value(args, "--file")?.into()),
                "--as" => created_by = Some(require_value(args, "--as")?),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            api,
            collection: collection.ok_or(ArgsError::MissingFlag {
                flag: "--collection",
            })?,
            file: file.ok_or(ArgsError::MissingFlag { flag: "--file" })?,
            created_by: created_by.ok_or(ArgsError::MissingFlag { flag: "--as" })?,
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim();
    let path = std::path::Path::new(trimmed.strip_prefix("sqlite:").unwrap_or(trimmed));
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
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

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn launch_ui(args: UiArgs) -> Result<(), Box<dyn std::error::Error>> {
    prepare_sqlite_file(&args.db_url)?;
    let services = AppServices::new_sqlite(
        &args.db_url,
        Clock::default_clock(),
        &args.api,
        StaticCredentials::from_env(),
    )
    .await?;
    tracing::info!(db = %args.db_url, "launching desktop ui");

    let app: Arc<dyn UiApp> = Arc::new(services);
    let context = build_app_context(&app);

    // Some dev setups default tao windows to always-on-top.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title(APP_TITLE)
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

async fn import(args: ImportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let text = tokio::fs::read_to_string(&args.file).await?;
    let questions = match parse_batch(&text) {
        Ok(questions) => questions,
        Err(err) => {
            for message in err.messages() {
                eprintln!("{message}");
            }
            return Err(err.into());
        }
    };

    let api = QuestionApi::new(&args.api)?;
    let inserted = api
        .insert_batch(&args.collection, &questions, &args.created_by)
        .await?;
    println!(
        "Inserted {inserted} question(s) into {}.",
        args.collection.as_str()
    );
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand launches the UI.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };
    if argv.first().is_some_and(|first| !first.starts_with("--")) {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let usage = |err: ArgsError| {
        eprintln!("{err}");
        print_usage();
        err
    };
    match cmd {
        Command::Ui => launch_ui(UiArgs::parse(&mut iter).map_err(usage)?).await,
        Command::Import => import(ImportArgs::parse(&mut iter).map_err(usage)?).await,
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
