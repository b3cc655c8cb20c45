//! StoreGateway trait definition.
//!
//! The ETL core only ever talks to the star schema through this trait, so the
//! same loaders run against SQLite and against the in-memory store.

use crate::error::Result;
use crate::records::{
    ArtistRecord, SongArtistIds, SongRecord, SongplayFact, TimeRecord, UserRecord,
};

/// Row counts of the five tables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub songs: usize,
    pub artists: usize,
    pub users: usize,
    pub time: usize,
    pub songplays: usize,
}

/// Write and lookup operations of the star schema.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait StoreGateway: Send + Sync {
    // =========================================================================
    // Transactions
    // =========================================================================

    /// Opens the unit of work for one input file.
    fn begin(&self) -> Result<()>;

    fn commit(&self) -> Result<()>;

    /// Discards everything written since `begin`.
    fn rollback(&self) -> Result<()>;

    // =========================================================================
    // Dimensions (upserts)
    // =========================================================================

    /// Inserts the song, or replaces every non-key field of an existing one.
    fn insert_song(&self, song: &SongRecord) -> Result<()>;

    /// Inserts the artist, or replaces its name. Known location and
    /// coordinates are kept when the incoming ones are null.
    fn insert_artist(&self, artist: &ArtistRecord) -> Result<()>;

    /// Inserts the user, or overwrites names, gender and level.
    fn insert_user(&self, user: &UserRecord) -> Result<()>;

    /// Appends a time row. Repeated timestamps produce repeated rows.
    fn insert_time(&self, time: &TimeRecord) -> Result<()>;

    // =========================================================================
    // Facts
    // =========================================================================

    /// Appends a songplay row.
    fn insert_songplay(&self, songplay: &SongplayFact) -> Result<()>;

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Exact match on song title, artist name and duration. Returns `None`
    /// unless exactly one song matches.
    fn lookup_song_and_artist(
        &self,
        title: &str,
        artist_name: &str,
        duration: f64,
    ) -> Result<Option<SongArtistIds>>;

    fn counts(&self) -> Result<TableCounts>;
}
