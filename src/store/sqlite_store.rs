//! SQLite-backed star schema store.

use super::gateway::{StoreGateway, TableCounts};
use super::schema::SPARKIFY_VERSIONED_SCHEMAS;
use crate::error::{EtlError, Result};
use crate::records::{
    format_start_time, ArtistRecord, SongArtistIds, SongRecord, SongplayFact, TimeRecord,
    UserRecord,
};
use crate::sqlite_persistence::VersionedSchema;
use rusqlite::{params, Connection, OpenFlags};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

pub struct SqliteStore {
    conn: Mutex<Connection>,
    target: String,
}

fn latest_schema() -> &'static VersionedSchema {
    &SPARKIFY_VERSIONED_SCHEMAS[SPARKIFY_VERSIONED_SCHEMAS.len() - 1]
}

/// Creates the schema on an empty database, otherwise checks that the
/// existing one is exactly the expected version and layout.
fn init_schema(conn: &Connection) -> anyhow::Result<()> {
    let schema = latest_schema();
    let table_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |r| r.get(0),
    )?;

    if table_count == 0 {
        info!("Creating sparkify db schema at version {}", schema.version);
        schema.create(conn)?;
        return Ok(());
    }

    let db_version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    if db_version != schema.user_version() as i64 {
        anyhow::bail!(
            "Database has schema version {}, expected {}",
            db_version,
            schema.user_version()
        );
    }
    schema.validate(conn)
}

impl SqliteStore {
    /// Opens (creating if missing) the database file at `db_path`.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        let target = db_path.display().to_string();
        let conn = Connection::open_with_flags(
            db_path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| EtlError::connection(&target, e))?;
        Self::from_connection(conn, target)
    }

    pub fn open_in_memory() -> Result<Self> {
        let target = ":memory:".to_string();
        let conn = Connection::open_in_memory().map_err(|e| EtlError::connection(&target, e))?;
        Self::from_connection(conn, target)
    }

    fn from_connection(conn: Connection, target: String) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(|e| EtlError::connection(&target, e))?;
        init_schema(&conn).map_err(|e| EtlError::connection(&target, format!("{:#}", e)))?;
        debug!("Opened store {}", target);
        Ok(SqliteStore {
            conn: Mutex::new(conn),
            target,
        })
    }

    /// Drops and recreates every table.
    pub fn reset(&self) -> Result<()> {
        let conn = self.conn("reset")?;
        let schema = latest_schema();
        schema
            .drop_tables(&conn)
            .and_then(|_| schema.create(&conn))
            .map_err(|e| EtlError::load("reset", format!("{:#}", e)))?;
        info!("Reset all tables of {}", self.target);
        Ok(())
    }

    fn conn(&self, operation: &'static str) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| EtlError::load(operation, "connection lock poisoned"))
    }

    fn execute_batch(&self, operation: &'static str, sql: &str) -> Result<()> {
        self.conn(operation)?
            .execute_batch(sql)
            .map_err(|e| EtlError::load(operation, e))
    }

    fn count(conn: &Connection, table: &str) -> Result<usize> {
        conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| {
            r.get::<_, i64>(0)
        })
        .map(|c| c as usize)
        .map_err(|e| EtlError::load("counts", e))
    }
}

impl StoreGateway for SqliteStore {
    fn begin(&self) -> Result<()> {
        self.execute_batch("begin", "BEGIN;")
    }

    fn commit(&self) -> Result<()> {
        self.execute_batch("commit", "COMMIT;")
    }

    fn rollback(&self) -> Result<()> {
        self.execute_batch("rollback", "ROLLBACK;")
    }

    fn insert_song(&self, song: &SongRecord) -> Result<()> {
        let conn = self.conn("insert_song")?;
        let mut stmt = conn
            .prepare_cached(
                "INSERT INTO songs (song_id, title, artist_id, year, duration)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(song_id) DO UPDATE SET
                    title = excluded.title,
                    artist_id = excluded.artist_id,
                    year = excluded.year,
                    duration = excluded.duration",
            )
            .map_err(|e| EtlError::load("insert_song", e))?;
        stmt.execute(params![
            song.song_id,
            song.title,
            song.artist_id,
            song.year,
            song.duration
        ])
        .map_err(|e| EtlError::load("insert_song", e))?;
        Ok(())
    }

    fn insert_artist(&self, artist: &ArtistRecord) -> Result<()> {
        let conn = self.conn("insert_artist")?;
        let mut stmt = conn
            .prepare_cached(
                "INSERT INTO artists (artist_id, name, location, latitude, longitude)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(artist_id) DO UPDATE SET
                    name = excluded.name,
                    location = COALESCE(excluded.location, artists.location),
                    latitude = COALESCE(excluded.latitude, artists.latitude),
                    longitude = COALESCE(excluded.longitude, artists.longitude)",
            )
            .map_err(|e| EtlError::load("insert_artist", e))?;
        stmt.execute(params![
            artist.artist_id,
            artist.name,
            artist.location,
            artist.latitude,
            artist.longitude
        ])
        .map_err(|e| EtlError::load("insert_artist", e))?;
        Ok(())
    }

    fn insert_user(&self, user: &UserRecord) -> Result<()> {
        let conn = self.conn("insert_user")?;
        let mut stmt = conn
            .prepare_cached(
                "INSERT INTO users (user_id, first_name, last_name, gender, level)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(user_id) DO UPDATE SET
                    first_name = excluded.first_name,
                    last_name = excluded.last_name,
                    gender = excluded.gender,
                    level = excluded.level",
            )
            .map_err(|e| EtlError::load("insert_user", e))?;
        stmt.execute(params![
            user.user_id,
            user.first_name,
            user.last_name,
            user.gender,
            user.level
        ])
        .map_err(|e| EtlError::load("insert_user", e))?;
        Ok(())
    }

    fn insert_time(&self, time: &TimeRecord) -> Result<()> {
        let conn = self.conn("insert_time")?;
        let mut stmt = conn
            .prepare_cached(
                "INSERT INTO time (start_time, hour, day, week, month, year, weekday)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )
            .map_err(|e| EtlError::load("insert_time", e))?;
        stmt.execute(params![
            format_start_time(&time.start_time),
            time.hour,
            time.day,
            time.week,
            time.month,
            time.year,
            time.weekday
        ])
        .map_err(|e| EtlError::load("insert_time", e))?;
        Ok(())
    }

    fn insert_songplay(&self, songplay: &SongplayFact) -> Result<()> {
        let conn = self.conn("insert_songplay")?;
        let mut stmt = conn
            .prepare_cached(
                "INSERT INTO songplays
                    (start_time, user_id, level, song_id, artist_id, session_id, location, user_agent)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )
            .map_err(|e| EtlError::load("insert_songplay", e))?;
        stmt.execute(params![
            format_start_time(&songplay.start_time),
            songplay.user_id,
            songplay.level,
            songplay.song_id,
            songplay.artist_id,
            songplay.session_id,
            songplay.location,
            songplay.user_agent
        ])
        .map_err(|e| EtlError::load("insert_songplay", e))?;
        Ok(())
    }

    fn lookup_song_and_artist(
        &self,
        title: &str,
        artist_name: &str,
        duration: f64,
    ) -> Result<Option<SongArtistIds>> {
        let conn = self.conn("lookup_song_and_artist")?;
        let mut stmt = conn
            .prepare_cached(
                "SELECT s.song_id, s.artist_id
                 FROM songs s
                 JOIN artists a ON a.artist_id = s.artist_id
                 WHERE s.title = ?1 AND a.name = ?2 AND s.duration = ?3
                 LIMIT 2",
            )
            .map_err(|e| EtlError::load("lookup_song_and_artist", e))?;
        let mut matches = stmt
            .query_map(params![title, artist_name, duration], |row| {
                Ok(SongArtistIds {
                    song_id: row.get(0)?,
                    artist_id: row.get(1)?,
                })
            })
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(|e| EtlError::load("lookup_song_and_artist", e))?;

        if matches.len() == 1 {
            Ok(matches.pop())
        } else {
            Ok(None)
        }
    }

    fn counts(&self) -> Result<TableCounts> {
        let conn = self.conn("counts")?;
        Ok(TableCounts {
            songs: Self::count(&conn, "songs")?,
            artists: Self::count(&conn, "artists")?,
            users: Self::count(&conn, "users")?,
            time: Self::count(&conn, "time")?,
            songplays: Self::count(&conn, "songplays")?,
        })
    }
}
