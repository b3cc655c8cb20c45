mod file_config;

pub use file_config::FileConfig;

use crate::etl::DEFAULT_EXTENSION;
use anyhow::{bail, Result};
use std::path::PathBuf;

pub const DEFAULT_SONG_DATA: &str = "data/song_data";
pub const DEFAULT_LOG_DATA: &str = "data/log_data";

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub database: Option<PathBuf>,
    pub song_data: PathBuf,
    pub log_data: PathBuf,
    pub extension: String,
    pub reset: bool,
    pub progress: bool,
    pub dry_run: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            database: None,
            song_data: PathBuf::from(DEFAULT_SONG_DATA),
            log_data: PathBuf::from(DEFAULT_LOG_DATA),
            extension: DEFAULT_EXTENSION.to_string(),
            reset: false,
            progress: false,
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `None` only for dry runs.
    pub database: Option<PathBuf>,
    pub song_data: PathBuf,
    pub log_data: PathBuf,
    pub extension: String,
    pub reset: bool,
    pub progress: bool,
    pub dry_run: bool,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let dry_run = file.dry_run.unwrap_or(cli.dry_run);
        let database = file
            .database
            .map(PathBuf::from)
            .or_else(|| cli.database.clone());

        match &database {
            Some(db_path) => {
                if db_path.is_dir() {
                    bail!("database is a directory: {:?}", db_path);
                }
                if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    if !parent.is_dir() {
                        bail!("Database directory does not exist: {:?}", parent);
                    }
                }
            }
            None if !dry_run => {
                bail!("database must be specified via --database or in config file")
            }
            None => {}
        }

        let extension = file
            .extension
            .unwrap_or_else(|| cli.extension.clone())
            .trim()
            .trim_start_matches('.')
            .to_string();
        if extension.is_empty() {
            bail!("extension must not be empty");
        }

        Ok(AppConfig {
            database,
            song_data: file
                .song_data
                .map(PathBuf::from)
                .unwrap_or_else(|| cli.song_data.clone()),
            log_data: file
                .log_data
                .map(PathBuf::from)
                .unwrap_or_else(|| cli.log_data.clone()),
            extension,
            reset: file.reset.unwrap_or(cli.reset),
            progress: file.progress.unwrap_or(cli.progress),
            dry_run,
        })
    }
}
