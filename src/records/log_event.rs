use super::{SongArtistIds, SongplayFact, TimeRecord, UserRecord};
use serde::Deserialize;

/// Only events on this page are song plays; everything else is discarded.
pub const NEXT_SONG_PAGE: &str = "NextSong";

/// `userId` is a string in most log files and a bare number in some.
#[derive(Clone, Deserialize, Debug, PartialEq)]
#[serde(untagged)]
pub enum RawUserId {
    Text(String),
    Number(i64),
}

impl RawUserId {
    fn into_text(self) -> String {
        match self {
            RawUserId::Text(s) => s.trim().to_string(),
            RawUserId::Number(n) => n.to_string(),
        }
    }
}

/// One line of a log file, as written by the event collector.
///
/// Every field but `page` may be absent on non-play events (login pages,
/// logged-out home visits, ...), so they are all optional here. Fields the
/// pipeline does not use are ignored.
#[derive(Clone, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LogEvent {
    pub page: String,
    pub ts: Option<i64>,
    pub user_id: Option<RawUserId>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: Option<String>,
    pub song: Option<String>,
    pub artist: Option<String>,
    pub length: Option<f64>,
    pub session_id: Option<i64>,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

/// A validated `NextSong` event, ready to be loaded.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayEvent {
    pub time: TimeRecord,
    pub user: UserRecord,
    pub song: Option<String>,
    pub artist: Option<String>,
    pub length: Option<f64>,
    pub session_id: i64,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

impl LogEvent {
    pub fn is_song_play(&self) -> bool {
        self.page == NEXT_SONG_PAGE
    }

    /// Validates a song-play event. Returns `Ok(None)` for any other page.
    pub fn into_play(self) -> Result<Option<PlayEvent>, String> {
        if !self.is_song_play() {
            return Ok(None);
        }

        let ts = self.ts.ok_or("NextSong event without ts")?;
        let time = TimeRecord::from_epoch_millis(ts)
            .ok_or_else(|| format!("ts {} is out of range", ts))?;

        let user_id = self
            .user_id
            .map(RawUserId::into_text)
            .filter(|id| !id.is_empty())
            .ok_or("NextSong event without userId")?;
        let level = self.level.ok_or("NextSong event without level")?;
        let session_id = self.session_id.ok_or("NextSong event without sessionId")?;

        Ok(Some(PlayEvent {
            time,
            user: UserRecord {
                user_id,
                first_name: self.first_name,
                last_name: self.last_name,
                gender: self.gender,
                level,
            },
            song: self.song,
            artist: self.artist,
            length: self.length,
            session_id,
            location: self.location,
            user_agent: self.user_agent,
        }))
    }
}

impl PlayEvent {
    /// Fact row for this play. Both ids are null unless the lookup matched.
    pub fn to_songplay(&self, ids: Option<SongArtistIds>) -> SongplayFact {
        let (song_id, artist_id) = match ids {
            Some(ids) => (Some(ids.song_id), Some(ids.artist_id)),
            None => (None, None),
        };
        SongplayFact {
            start_time: self.time.start_time,
            user_id: self.user.user_id.clone(),
            level: self.user.level.clone(),
            song_id,
            artist_id,
            session_id: self.session_id,
            location: self.location.clone(),
            user_agent: self.user_agent.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAY_LINE: &str = r#"{"artist":"Pavement","auth":"Logged In","firstName":"Sylvie","gender":"F","itemInSession":0,"lastName":"Cruz","length":99.16036,"level":"free","location":"Washington-Arlington-Alexandria, DC-VA-MD-WV","method":"PUT","page":"NextSong","registration":1540266185796.0,"sessionId":345,"song":"Mercy:The Laundromat","status":200,"ts":1541990258796,"userAgent":"Mozilla/5.0","userId":"10"}"#;

    #[test]
    fn parses_play_event() {
        let event: LogEvent = serde_json::from_str(PLAY_LINE).unwrap();
        assert!(event.is_song_play());

        let play = event.into_play().unwrap().unwrap();
        assert_eq!(play.user.user_id, "10");
        assert_eq!(play.user.first_name.as_deref(), Some("Sylvie"));
        assert_eq!(play.user.level, "free");
        assert_eq!(play.song.as_deref(), Some("Mercy:The Laundromat"));
        assert_eq!(play.artist.as_deref(), Some("Pavement"));
        assert_eq!(play.length, Some(99.16036));
        assert_eq!(play.session_id, 345);
        assert_eq!(play.time.year, 2018);
    }

    #[test]
    fn accepts_numeric_user_id() {
        let line = PLAY_LINE.replace(r#""userId":"10""#, r#""userId":10"#);
        let event: LogEvent = serde_json::from_str(&line).unwrap();
        assert_eq!(event.user_id, Some(RawUserId::Number(10)));
        assert_eq!(event.into_play().unwrap().unwrap().user.user_id, "10");
    }

    #[test]
    fn other_pages_are_not_plays() {
        let line = r#"{"auth":"Logged Out","page":"Home","sessionId":12,"ts":1541121934796,"userId":""}"#;
        let event: LogEvent = serde_json::from_str(line).unwrap();
        assert!(!event.is_song_play());
        assert_eq!(event.into_play(), Ok(None));
    }

    #[test]
    fn play_without_session_is_rejected() {
        let line = PLAY_LINE.replace(r#""sessionId":345,"#, "");
        let event: LogEvent = serde_json::from_str(&line).unwrap();
        let err = event.into_play().unwrap_err();
        assert!(err.contains("sessionId"));
    }

    #[test]
    fn play_with_blank_user_is_rejected() {
        let line = PLAY_LINE.replace(r#""userId":"10""#, r#""userId":"""#);
        let event: LogEvent = serde_json::from_str(&line).unwrap();
        assert!(event.into_play().is_err());
    }

    #[test]
    fn songplay_ids_are_null_without_match() {
        let event: LogEvent = serde_json::from_str(PLAY_LINE).unwrap();
        let play = event.into_play().unwrap().unwrap();

        let unmatched = play.to_songplay(None);
        assert_eq!(unmatched.song_id, None);
        assert_eq!(unmatched.artist_id, None);
        assert_eq!(unmatched.user_id, "10");
        assert_eq!(unmatched.level, "free");

        let matched = play.to_songplay(Some(SongArtistIds {
            song_id: "S1".to_string(),
            artist_id: "A1".to_string(),
        }));
        assert_eq!(matched.song_id.as_deref(), Some("S1"));
        assert_eq!(matched.artist_id.as_deref(), Some("A1"));
    }
}
