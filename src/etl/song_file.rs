use super::handler::{FileCategory, FileHandler, FileStats};
use crate::error::{EtlError, Result};
use crate::records::SongFile;
use crate::store::StoreGateway;
use std::path::Path;
use tracing::trace;

/// Reads a song-data file holding exactly one JSON record.
pub fn read_song_file(path: &Path) -> Result<SongFile> {
    let bytes = std::fs::read(path).map_err(|e| EtlError::io(path, e))?;
    serde_json::from_slice(&bytes).map_err(|e| EtlError::parse(path, None, e))
}

/// Upserts the song and then its artist.
pub struct SongFileHandler;

impl FileHandler for SongFileHandler {
    fn category(&self) -> FileCategory {
        FileCategory::Song
    }

    fn process(&self, path: &Path, store: &dyn StoreGateway) -> Result<FileStats> {
        let (song, artist) = read_song_file(path)?.into_records();
        trace!("Loading song {} by {}", song.song_id, artist.artist_id);

        store.insert_song(&song)?;
        store.insert_artist(&artist)?;

        Ok(FileStats {
            songs: 1,
            artists: 1,
            ..Default::default()
        })
    }
}
