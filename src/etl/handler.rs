use crate::error::Result;
use crate::store::StoreGateway;
use std::fmt;
use std::ops::AddAssign;
use std::path::Path;

/// The two families of input files.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileCategory {
    Song,
    Log,
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileCategory::Song => write!(f, "song"),
            FileCategory::Log => write!(f, "log"),
        }
    }
}

/// What loading one file (or a whole directory) wrote.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FileStats {
    pub songs: usize,
    pub artists: usize,
    /// Every event line of a log file, plays or not.
    pub events_read: usize,
    /// `NextSong` events; one time row, one user upsert and one songplay each.
    pub events_kept: usize,
    pub songplays_matched: usize,
    pub songplays_unmatched: usize,
}

impl AddAssign for FileStats {
    fn add_assign(&mut self, other: Self) {
        self.songs += other.songs;
        self.artists += other.artists;
        self.events_read += other.events_read;
        self.events_kept += other.events_kept;
        self.songplays_matched += other.songplays_matched;
        self.songplays_unmatched += other.songplays_unmatched;
    }
}

/// Loads one input file into the store. The caller owns the transaction.
pub trait FileHandler {
    fn category(&self) -> FileCategory;

    fn process(&self, path: &Path, store: &dyn StoreGateway) -> Result<FileStats>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_accumulate() {
        let mut total = FileStats::default();
        total += FileStats {
            events_read: 3,
            events_kept: 2,
            songplays_matched: 1,
            songplays_unmatched: 1,
            ..Default::default()
        };
        total += FileStats {
            songs: 1,
            artists: 1,
            ..Default::default()
        };
        assert_eq!(total.events_read, 3);
        assert_eq!(total.events_kept, 2);
        assert_eq!(total.songs, 1);
        assert_eq!(total.songplays_matched + total.songplays_unmatched, 2);
    }

    #[test]
    fn category_display() {
        assert_eq!(FileCategory::Song.to_string(), "song");
        assert_eq!(FileCategory::Log.to_string(), "log");
    }
}
