use super::handler::{FileCategory, FileHandler, FileStats};
use crate::error::{EtlError, Result};
use crate::records::{LogEvent, PlayEvent, SongArtistIds};
use crate::store::StoreGateway;
use std::path::Path;
use tracing::{debug, trace};

/// Events of one log file, already filtered down to song plays.
#[derive(Debug)]
pub struct ParsedLog {
    pub events_read: usize,
    pub plays: Vec<PlayEvent>,
}

/// Parses every line of a JSON-lines log file. Blank lines are skipped and
/// the first bad line fails the whole file.
pub fn read_log_file(path: &Path) -> Result<ParsedLog> {
    let bytes = std::fs::read(path).map_err(|e| EtlError::io(path, e))?;

    let mut events_read = 0;
    let mut plays = Vec::new();
    for (index, raw) in bytes.split(|b| *b == b'\n').enumerate() {
        let line_number = index + 1;
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        let line = std::str::from_utf8(raw)
            .map_err(|e| EtlError::parse(path, Some(line_number), e))?;
        if line.trim().is_empty() {
            continue;
        }
        let event: LogEvent = serde_json::from_str(line)
            .map_err(|e| EtlError::parse(path, Some(line_number), e))?;
        events_read += 1;

        if let Some(play) = event
            .into_play()
            .map_err(|reason| EtlError::parse(path, Some(line_number), reason))?
        {
            plays.push(play);
        }
    }

    Ok(ParsedLog { events_read, plays })
}

/// Loads the `NextSong` events of a log file: time rows first, then user
/// upserts, then one songplay per event with its song/artist resolved by
/// lookup.
pub struct LogFileHandler;

impl LogFileHandler {
    fn resolve(play: &PlayEvent, store: &dyn StoreGateway) -> Result<Option<SongArtistIds>> {
        match (&play.song, &play.artist, play.length) {
            (Some(song), Some(artist), Some(length)) => {
                store.lookup_song_and_artist(song, artist, length)
            }
            _ => Ok(None),
        }
    }
}

impl FileHandler for LogFileHandler {
    fn category(&self) -> FileCategory {
        FileCategory::Log
    }

    fn process(&self, path: &Path, store: &dyn StoreGateway) -> Result<FileStats> {
        let ParsedLog { events_read, plays } = read_log_file(path)?;
        debug!(
            "{}: {} events, {} song plays",
            path.display(),
            events_read,
            plays.len()
        );

        for play in &plays {
            store.insert_time(&play.time)?;
        }

        for play in &plays {
            store.insert_user(&play.user)?;
        }

        let mut stats = FileStats {
            events_read,
            events_kept: plays.len(),
            ..Default::default()
        };
        for play in &plays {
            let ids = Self::resolve(play, store)?;
            match &ids {
                Some(ids) => {
                    trace!("Matched play to song {}", ids.song_id);
                    stats.songplays_matched += 1;
                }
                None => stats.songplays_unmatched += 1,
            }
            store.insert_songplay(&play.to_songplay(ids))?;
        }

        Ok(stats)
    }
}
