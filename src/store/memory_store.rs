//! In-memory star schema with the same upsert, lookup and transaction
//! behaviour as `SqliteStore`. Used for dry runs and in tests.

use super::gateway::{StoreGateway, TableCounts};
use crate::error::{EtlError, Result};
use crate::records::{
    ArtistRecord, SongArtistIds, SongRecord, SongplayFact, TimeRecord, UserRecord,
};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Clone, Default)]
struct Tables {
    songs: BTreeMap<String, SongRecord>,
    artists: BTreeMap<String, ArtistRecord>,
    users: BTreeMap<String, UserRecord>,
    time: Vec<TimeRecord>,
    songplays: Vec<SongplayFact>,
}

#[derive(Default)]
struct State {
    tables: Tables,
    /// Copy of `tables` taken at `begin`, restored on `rollback`.
    snapshot: Option<Tables>,
}

#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self, operation: &'static str) -> Result<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| EtlError::load(operation, "state lock poisoned"))
    }

    pub fn song(&self, song_id: &str) -> Option<SongRecord> {
        self.state("song")
            .ok()
            .and_then(|s| s.tables.songs.get(song_id).cloned())
    }

    pub fn artist(&self, artist_id: &str) -> Option<ArtistRecord> {
        self.state("artist")
            .ok()
            .and_then(|s| s.tables.artists.get(artist_id).cloned())
    }

    pub fn user(&self, user_id: &str) -> Option<UserRecord> {
        self.state("user")
            .ok()
            .and_then(|s| s.tables.users.get(user_id).cloned())
    }

    pub fn time_rows(&self) -> Vec<TimeRecord> {
        self.state("time_rows")
            .map(|s| s.tables.time.clone())
            .unwrap_or_default()
    }

    /// Songplays in insertion order.
    pub fn songplays(&self) -> Vec<SongplayFact> {
        self.state("songplays")
            .map(|s| s.tables.songplays.clone())
            .unwrap_or_default()
    }
}

impl StoreGateway for InMemoryStore {
    fn begin(&self) -> Result<()> {
        let mut state = self.state("begin")?;
        if state.snapshot.is_some() {
            return Err(EtlError::load("begin", "transaction already open"));
        }
        state.snapshot = Some(state.tables.clone());
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        let mut state = self.state("commit")?;
        match state.snapshot.take() {
            Some(_) => Ok(()),
            None => Err(EtlError::load("commit", "no transaction is active")),
        }
    }

    fn rollback(&self) -> Result<()> {
        let mut state = self.state("rollback")?;
        match state.snapshot.take() {
            Some(snapshot) => {
                state.tables = snapshot;
                Ok(())
            }
            None => Err(EtlError::load("rollback", "no transaction is active")),
        }
    }

    fn insert_song(&self, song: &SongRecord) -> Result<()> {
        let mut state = self.state("insert_song")?;
        state
            .tables
            .songs
            .insert(song.song_id.clone(), song.clone());
        Ok(())
    }

    fn insert_artist(&self, artist: &ArtistRecord) -> Result<()> {
        let mut state = self.state("insert_artist")?;
        let merged = match state.tables.artists.get(&artist.artist_id) {
            Some(existing) => ArtistRecord {
                artist_id: artist.artist_id.clone(),
                name: artist.name.clone(),
                location: artist.location.clone().or(existing.location.clone()),
                latitude: artist.latitude.or(existing.latitude),
                longitude: artist.longitude.or(existing.longitude),
            },
            None => artist.clone(),
        };
        state.tables.artists.insert(merged.artist_id.clone(), merged);
        Ok(())
    }

    fn insert_user(&self, user: &UserRecord) -> Result<()> {
        let mut state = self.state("insert_user")?;
        state.tables.users.insert(user.user_id.clone(), user.clone());
        Ok(())
    }

    fn insert_time(&self, time: &TimeRecord) -> Result<()> {
        let mut state = self.state("insert_time")?;
        state.tables.time.push(time.clone());
        Ok(())
    }

    fn insert_songplay(&self, songplay: &SongplayFact) -> Result<()> {
        let mut state = self.state("insert_songplay")?;
        if !state.tables.users.contains_key(&songplay.user_id) {
            return Err(EtlError::load(
                "insert_songplay",
                format!("unknown user_id {}", songplay.user_id),
            ));
        }
        state.tables.songplays.push(songplay.clone());
        Ok(())
    }

    fn lookup_song_and_artist(
        &self,
        title: &str,
        artist_name: &str,
        duration: f64,
    ) -> Result<Option<SongArtistIds>> {
        let state = self.state("lookup_song_and_artist")?;
        let tables = &state.tables;
        let mut matches = tables.songs.values().filter(|song| {
            song.title == title
                && song.duration == duration
                && tables
                    .artists
                    .get(&song.artist_id)
                    .is_some_and(|artist| artist.name == artist_name)
        });

        match (matches.next(), matches.next()) {
            (Some(song), None) => Ok(Some(SongArtistIds {
                song_id: song.song_id.clone(),
                artist_id: song.artist_id.clone(),
            })),
            _ => Ok(None),
        }
    }

    fn counts(&self) -> Result<TableCounts> {
        let state = self.state("counts")?;
        Ok(TableCounts {
            songs: state.tables.songs.len(),
            artists: state.tables.artists.len(),
            users: state.tables.users.len(),
            time: state.tables.time.len(),
            songplays: state.tables.songplays.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(song_id: &str, duration: f64) -> SongRecord {
        SongRecord {
            song_id: song_id.to_string(),
            title: "Karma".to_string(),
            artist_id: "ARGE7G11187FB37E2B".to_string(),
            year: 0,
            duration,
        }
    }

    fn artist(location: Option<&str>) -> ArtistRecord {
        ArtistRecord {
            artist_id: "ARGE7G11187FB37E2B".to_string(),
            name: "Alanis Morissette".to_string(),
            location: location.map(str::to_string),
            latitude: None,
            longitude: None,
        }
    }

    fn user(level: &str) -> UserRecord {
        UserRecord {
            user_id: "15".to_string(),
            first_name: Some("Lily".to_string()),
            last_name: Some("Koch".to_string()),
            gender: Some("F".to_string()),
            level: level.to_string(),
        }
    }

    #[test]
    fn upserts_do_not_duplicate_dimensions() {
        let store = InMemoryStore::new();
        for _ in 0..2 {
            store.insert_song(&song("SOSVMII12AB01039D7", 326.0)).unwrap();
            store.insert_artist(&artist(Some("Ottawa"))).unwrap();
        }
        let counts = store.counts().unwrap();
        assert_eq!(counts.songs, 1);
        assert_eq!(counts.artists, 1);
    }

    #[test]
    fn artist_keeps_known_location() {
        let store = InMemoryStore::new();
        store.insert_artist(&artist(Some("Ottawa"))).unwrap();
        store.insert_artist(&artist(None)).unwrap();
        assert_eq!(
            store.artist("ARGE7G11187FB37E2B").unwrap().location.as_deref(),
            Some("Ottawa")
        );
    }

    #[test]
    fn user_level_last_write_wins() {
        let store = InMemoryStore::new();
        store.insert_user(&user("free")).unwrap();
        store.insert_user(&user("paid")).unwrap();
        assert_eq!(store.user("15").unwrap().level, "paid");
        assert_eq!(store.counts().unwrap().users, 1);
    }

    #[test]
    fn lookup_matches_exactly_one_song() {
        let store = InMemoryStore::new();
        store.insert_artist(&artist(None)).unwrap();
        store.insert_song(&song("S1", 326.0)).unwrap();
        store.insert_song(&song("S2", 300.0)).unwrap();

        let found = store
            .lookup_song_and_artist("Karma", "Alanis Morissette", 300.0)
            .unwrap()
            .unwrap();
        assert_eq!(found.song_id, "S2");

        assert_eq!(
            store
                .lookup_song_and_artist("Karma", "Alanis Morissette", 301.0)
                .unwrap(),
            None
        );

        store.insert_song(&song("S3", 300.0)).unwrap();
        assert_eq!(
            store
                .lookup_song_and_artist("Karma", "Alanis Morissette", 300.0)
                .unwrap(),
            None
        );
    }

    #[test]
    fn rollback_restores_state_at_begin() {
        let store = InMemoryStore::new();
        store.insert_user(&user("free")).unwrap();

        store.begin().unwrap();
        store.insert_user(&user("paid")).unwrap();
        store
            .insert_time(&TimeRecord::from_epoch_millis(1541121934796).unwrap())
            .unwrap();
        store.rollback().unwrap();

        assert_eq!(store.user("15").unwrap().level, "free");
        assert!(store.time_rows().is_empty());
    }

    #[test]
    fn commit_without_begin_fails() {
        let store = InMemoryStore::new();
        assert!(store.commit().is_err());
        store.begin().unwrap();
        assert!(store.begin().is_err());
        store.commit().unwrap();
    }

    #[test]
    fn songplay_requires_known_user() {
        let store = InMemoryStore::new();
        let time = TimeRecord::from_epoch_millis(1541121934796).unwrap();
        let fact = SongplayFact {
            start_time: time.start_time,
            user_id: "15".to_string(),
            level: "free".to_string(),
            song_id: None,
            artist_id: None,
            session_id: 583,
            location: None,
            user_agent: None,
        };
        assert!(store.insert_songplay(&fact).is_err());

        store.insert_user(&user("free")).unwrap();
        store.insert_songplay(&fact).unwrap();
        assert_eq!(store.songplays(), vec![fact]);
    }
}
