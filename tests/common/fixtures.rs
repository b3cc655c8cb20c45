//! Test fixture creation for data directories

use super::constants::*;
use anyhow::Result;
use sparkify_etl::config::AppConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Song file for "Karma", the song the log fixture plays.
pub fn karma_song_json() -> String {
    format!(
        r#"{{"num_songs": 1, "artist_id": "{}", "artist_latitude": null, "artist_longitude": null, "artist_location": "", "artist_name": "{}", "song_id": "{}", "title": "{}", "duration": 326.00, "year": 0}}"#,
        KARMA_ARTIST_ID, KARMA_ARTIST_NAME, KARMA_SONG_ID, KARMA_TITLE
    )
}

fn other_song_json() -> String {
    format!(
        r#"{{"num_songs": 1, "artist_id": "{}", "artist_latitude": null, "artist_longitude": null, "artist_location": "California - LA", "artist_name": "Casual", "song_id": "{}", "title": "I Didn't Mean To", "duration": 218.93179, "year": 0}}"#,
        OTHER_ARTIST_ID, OTHER_SONG_ID
    )
}

/// One log line by the fixture user.
pub fn event_line(page: &str, ts: i64, level: &str, song: &str, artist: &str, length: f64) -> String {
    format!(
        r#"{{"artist":"{}","auth":"Logged In","firstName":"Lily","gender":"F","itemInSession":0,"lastName":"Koch","length":{},"level":"{}","location":"Chicago-Naperville-Elgin, IL-IN-WI","method":"PUT","page":"{}","registration":1540893744796.0,"sessionId":{},"song":"{}","status":200,"ts":{},"userAgent":"Mozilla/5.0 (X11; Linux x86_64)","userId":"{}"}}"#,
        artist, length, level, page, SESSION_ID, song, ts, USER_ID
    )
}

/// Temp dir holding `song_data/`, `log_data/` and the database path.
pub struct TestData {
    pub dir: TempDir,
    pub song_dir: PathBuf,
    pub log_dir: PathBuf,
    pub db_path: PathBuf,
}

impl TestData {
    /// Two song files (one of them "Karma") and one log file with three
    /// events: a Karma play, a Home page visit and an unmatched play.
    pub fn create() -> Result<Self> {
        let data = Self::empty()?;
        data.write_song("A/A/A/TRAAAAW128F429D538.json", &other_song_json())?;
        data.write_song("A/A/B/TRAABJL12903CDCF1A.json", &karma_song_json())?;
        data.write_log(
            "2018/11/2018-11-02-events.json",
            &[
                event_line(
                    "NextSong",
                    FIRST_PLAY_TS,
                    "free",
                    KARMA_TITLE,
                    KARMA_ARTIST_NAME,
                    KARMA_DURATION,
                ),
                r#"{"artist":null,"auth":"Logged In","firstName":"Lily","gender":"F","itemInSession":1,"lastName":"Koch","length":null,"level":"free","location":"Chicago-Naperville-Elgin, IL-IN-WI","method":"GET","page":"Home","registration":1540893744796.0,"sessionId":583,"song":null,"status":200,"ts":1541122000000,"userAgent":"Mozilla/5.0 (X11; Linux x86_64)","userId":"15"}"#.to_string(),
                event_line(
                    "NextSong",
                    SECOND_PLAY_TS,
                    "paid",
                    "Mercy:The Laundromat",
                    "Pavement",
                    99.16036,
                ),
            ],
        )?;
        Ok(data)
    }

    pub fn empty() -> Result<Self> {
        let dir = TempDir::new()?;
        let song_dir = dir.path().join("song_data");
        let log_dir = dir.path().join("log_data");
        fs::create_dir_all(&song_dir)?;
        fs::create_dir_all(&log_dir)?;
        let db_path = dir.path().join("sparkify.db");
        Ok(TestData {
            dir,
            song_dir,
            log_dir,
            db_path,
        })
    }

    pub fn write_song(&self, relative: &str, content: &str) -> Result<PathBuf> {
        write(&self.song_dir, relative, content)
    }

    pub fn write_log(&self, relative: &str, lines: &[String]) -> Result<PathBuf> {
        write(&self.log_dir, relative, &lines.join("\n"))
    }
}

fn write(root: &Path, relative: &str, content: &str) -> Result<PathBuf> {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, content)?;
    Ok(path)
}

/// Config pointing at the fixture directories and database.
pub fn app_config(data: &TestData) -> AppConfig {
    AppConfig {
        database: Some(data.db_path.clone()),
        song_data: data.song_dir.clone(),
        log_data: data.log_dir.clone(),
        extension: "json".to_string(),
        reset: false,
        progress: false,
        dry_run: false,
    }
}
