use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use quiz_core::model::UserId;
use services::{AppServices, Clock, QuizSettings};
use storage::repository::Storage;
use storage::seed::{ensure_user, seed_sample_lessons};
use tracing_subscriber::EnvFilter;
use ui::{AdvanceInbox, App, UiApp, build_app_context};

const DEFAULT_DB_URL: &str = "sqlite://quiz.sqlite3";
const DEFAULT_ADVANCE_MS: u64 = 1500;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidUid { raw: String },
    InvalidAdvanceMs { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidUid { raw } => write!(f, "invalid --uid value: {raw:?}"),
            ArgsError::InvalidAdvanceMs { raw } => {
                write!(f, "invalid --advance-ms value: {raw}")
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

struct DesktopApp {
    user_id: Option<UserId>,
    services: AppServices,
    advance: AdvanceInbox,
}

impl UiApp for DesktopApp {
    fn user_id(&self) -> Option<UserId> {
        self.user_id.clone()
    }

    fn services(&self) -> AppServices {
        self.services.clone()
    }

    fn advance_signals(&self) -> AdvanceInbox {
        self.advance.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Seed,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "seed" => Some(Self::Seed),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Args {
    db_url: String,
    uid: Option<UserId>,
    advance_delay: Duration,
    // seed only
    name: String,
    admin: bool,
}

impl Args {
    fn parse(cmd: Command, args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("QUIZ_DB_URL")
            .ok()
            .map_or_else(|| normalize_sqlite_url(DEFAULT_DB_URL.into()), normalize_sqlite_url);
        // A blank QUIZ_UID counts as absent.
        let mut uid = std::env::var("QUIZ_UID")
            .ok()
            .and_then(|value| value.parse::<UserId>().ok());
        let mut advance_delay = match std::env::var("QUIZ_ADVANCE_MS") {
            Ok(raw) => parse_advance_ms(&raw)?,
            Err(_) => Duration::from_millis(DEFAULT_ADVANCE_MS),
        };
        let mut name = std::env::var("QUIZ_USER_NAME").unwrap_or_else(|_| "Learner".into());
        let mut admin = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--uid" => {
                    let value = require_value(args, "--uid")?;
                    let parsed = value
                        .parse::<UserId>()
                        .map_err(|_| ArgsError::InvalidUid { raw: value.clone() })?;
                    uid = Some(parsed);
                }
                "--advance-ms" if cmd == Command::Ui => {
                    advance_delay = parse_advance_ms(&require_value(args, "--advance-ms")?)?;
                }
                "--name" if cmd == Command::Seed => {
                    name = require_value(args, "--name")?;
                }
                "--admin" if cmd == Command::Seed => admin = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            uid,
            advance_delay,
            name,
            admin,
        })
    }
}

fn parse_advance_ms(raw: &str) -> Result<Duration, ArgsError> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| ArgsError::InvalidAdvanceMs { raw: raw.to_string() })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  quiz [ui]   [--db <sqlite_url>] [--uid <id>] [--advance-ms <ms>]");
    eprintln!("  quiz seed   [--db <sqlite_url>] [--uid <id> [--name <name>] [--admin]]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --advance-ms {DEFAULT_ADVANCE_MS}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_UID, QUIZ_ADVANCE_MS, QUIZ_USER_NAME, RUST_LOG");
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
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn launch_ui(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let settings = QuizSettings::default().with_advance_delay(args.advance_delay);
    let (services, advance_rx) =
        AppServices::new_sqlite(&args.db_url, Clock::default_clock(), settings).await?;

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        user_id: args.uid,
        services,
        advance: AdvanceInbox::new(advance_rx),
    });
    let context = build_app_context(&app);
    tracing::info!(db = %args.db_url, "launching desktop ui");

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Quiz")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

async fn seed(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let storage = Storage::sqlite(&args.db_url).await?;
    let lessons = seed_sample_lessons(storage.lessons.as_ref()).await?;
    if let Some(uid) = &args.uid {
        ensure_user(storage.users.as_ref(), uid, &args.name, args.admin).await?;
    }
    println!(
        "Seeded {} lessons{} into {}",
        lessons.len(),
        args.uid
            .as_ref()
            .map(|uid| format!(" and user {uid}"))
            .unwrap_or_default(),
        args.db_url
    );
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: launching UI when no subcommand is provided.
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

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let parsed = Args::parse(cmd, &mut argv.into_iter()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_tracing();

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;

    match cmd {
        Command::Ui => launch_ui(parsed).await,
        Command::Seed => seed(parsed).await,
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
