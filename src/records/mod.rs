//! Rows of the star schema and the raw file records they come from.

mod log_event;
mod song;
mod time;

pub use log_event::{LogEvent, PlayEvent, RawUserId, NEXT_SONG_PAGE};
pub use song::{ArtistRecord, SongFile, SongRecord};
pub use time::{format_start_time, TimeRecord};

use chrono::{DateTime, Utc};

/// User dimension row. `level` and the name fields follow the latest event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserRecord {
    pub user_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: String,
}

/// Songplay fact row.
#[derive(Clone, Debug, PartialEq)]
pub struct SongplayFact {
    pub start_time: DateTime<Utc>,
    pub user_id: String,
    pub level: String,
    pub song_id: Option<String>,
    pub artist_id: Option<String>,
    pub session_id: i64,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

/// Result of a successful song/artist lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SongArtistIds {
    pub song_id: String,
    pub artist_id: String,
}
