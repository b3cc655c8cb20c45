//! Loading of song and log data directories into a `StoreGateway`.

mod batch;
mod discovery;
mod handler;
mod log_file;
mod progress;
mod song_file;

pub use batch::{BatchLoader, LoadSummary};
pub use discovery::{FileDiscovery, DEFAULT_EXTENSION};
pub use handler::{FileCategory, FileHandler, FileStats};
pub use log_file::{read_log_file, LogFileHandler, ParsedLog};
pub use progress::{BarProgress, LogProgress, ProgressReporter};
pub use song_file::{read_song_file, SongFileHandler};
