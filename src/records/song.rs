use serde::Deserialize;

/// Raw content of a song-data file: one song's metadata, artist fields inlined.
#[derive(Clone, Deserialize, Debug)]
pub struct SongFile {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    #[serde(default)]
    pub year: Option<i32>,
    pub duration: f64,
    pub artist_name: String,
    #[serde(default)]
    pub artist_location: Option<String>,
    #[serde(default)]
    pub artist_latitude: Option<f64>,
    #[serde(default)]
    pub artist_longitude: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SongRecord {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    /// 0 when unknown.
    pub year: i32,
    /// Seconds.
    pub duration: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ArtistRecord {
    pub artist_id: String,
    pub name: String,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl SongFile {
    /// Splits the file into its song and artist dimension rows.
    pub fn into_records(self) -> (SongRecord, ArtistRecord) {
        let song = SongRecord {
            song_id: self.song_id,
            title: self.title,
            artist_id: self.artist_id.clone(),
            year: self.year.unwrap_or(0),
            duration: self.duration,
        };
        let artist = ArtistRecord {
            artist_id: self.artist_id,
            name: self.artist_name,
            location: self.artist_location.filter(|l| !l.trim().is_empty()),
            latitude: self.artist_latitude,
            longitude: self.artist_longitude,
        };
        (song, artist)
    }
}
