//! The full ETL run: every song file, then every log file.
//!
//! Songs go first so that log events can resolve their song and artist ids.

use crate::config::AppConfig;
use crate::error::Result;
use crate::etl::{
    BatchLoader, FileDiscovery, LoadSummary, LogFileHandler, ProgressReporter, SongFileHandler,
};
use crate::store::{StoreGateway, TableCounts};
use tracing::info;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineSummary {
    pub songs: LoadSummary,
    pub logs: LoadSummary,
    /// Table sizes after the run.
    pub counts: TableCounts,
}

impl PipelineSummary {
    pub fn log(&self) {
        info!("ETL Summary");
        info!("===========");
        info!(
            "Song files: {}/{} loaded from {}",
            self.songs.files_loaded,
            self.songs.files_found,
            self.songs.root.display()
        );
        info!(
            "Log files: {}/{} loaded from {}",
            self.logs.files_loaded,
            self.logs.files_found,
            self.logs.root.display()
        );
        info!(
            "Events: {} read, {} song plays",
            self.logs.stats.events_read, self.logs.stats.events_kept
        );
        info!(
            "Song plays: {} matched, {} unmatched",
            self.logs.stats.songplays_matched, self.logs.stats.songplays_unmatched
        );
        info!(
            "Tables: songs={} artists={} users={} time={} songplays={}",
            self.counts.songs,
            self.counts.artists,
            self.counts.users,
            self.counts.time,
            self.counts.songplays
        );
    }
}

pub fn run_pipeline(
    config: &AppConfig,
    store: &dyn StoreGateway,
    progress: &dyn ProgressReporter,
) -> Result<PipelineSummary> {
    let loader = BatchLoader::new(store, FileDiscovery::new(&config.extension));

    info!("Loading song data from {}", config.song_data.display());
    let songs = loader.load_dir(&config.song_data, &SongFileHandler, progress)?;

    info!("Loading log data from {}", config.log_data.display());
    let logs = loader.load_dir(&config.log_data, &LogFileHandler, progress)?;

    Ok(PipelineSummary {
        songs,
        logs,
        counts: store.counts()?,
    })
}
