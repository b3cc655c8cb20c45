use anyhow::{Context, Result};
use clap::Parser;
use sparkify_etl::config::{AppConfig, CliConfig, FileConfig, DEFAULT_LOG_DATA, DEFAULT_SONG_DATA};
use sparkify_etl::etl::{BarProgress, LogProgress, ProgressReporter, DEFAULT_EXTENSION};
use sparkify_etl::{run_pipeline, InMemoryStore, SqliteStore, StoreGateway};
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(name = "sparkify-etl")]
#[command(about = "Load song and log data files into the Sparkify star schema")]
struct CliArgs {
    /// Path to the SQLite database file. Created if missing.
    #[clap(long, value_parser = parse_path)]
    pub database: Option<PathBuf>,

    /// Root directory of the song metadata files.
    #[clap(long, value_parser = parse_path, default_value = DEFAULT_SONG_DATA)]
    pub song_data: PathBuf,

    /// Root directory of the activity log files.
    #[clap(long, value_parser = parse_path, default_value = DEFAULT_LOG_DATA)]
    pub log_data: PathBuf,

    /// Extension of the data files to load.
    #[clap(long, default_value = DEFAULT_EXTENSION)]
    pub extension: String,

    /// Drop and recreate all tables before loading.
    #[clap(long)]
    pub reset: bool,

    /// Show a progress bar instead of one log line per file.
    #[clap(long)]
    pub progress: bool,

    /// Load into memory only, without touching any database file.
    #[clap(long)]
    pub dry_run: bool,

    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            database: self.database.clone(),
            song_data: self.song_data.clone(),
            log_data: self.log_data.clone(),
            extension: self.extension.clone(),
            reset: self.reset,
            progress: self.progress,
            dry_run: self.dry_run,
        }
    }
}

fn open_store(config: &AppConfig) -> Result<Box<dyn StoreGateway>> {
    if config.dry_run {
        info!("Dry run: loading into memory, nothing will be written");
        return Ok(Box::new(InMemoryStore::new()));
    }

    let db_path = config
        .database
        .as_ref()
        .context("database path is required outside of dry runs")?;
    info!("Opening SQLite database at {:?}...", db_path);
    let store = SqliteStore::open(db_path)?;
    if config.reset {
        store.reset()?;
    }
    Ok(Box::new(store))
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    let store = open_store(&config)?;
    let progress: Box<dyn ProgressReporter> = if config.progress {
        Box::new(BarProgress::new())
    } else {
        Box::new(LogProgress)
    };

    let summary = run_pipeline(&config, store.as_ref(), progress.as_ref())
        .context("ETL run aborted")?;
    summary.log();

    Ok(())
}
