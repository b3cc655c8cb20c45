//! Shared constants for end-to-end tests

// ============================================================================
// Song data
// ============================================================================

pub const KARMA_SONG_ID: &str = "SOSVMII12AB01039D7";
pub const KARMA_TITLE: &str = "Karma";
pub const KARMA_ARTIST_ID: &str = "ARGE7G11187FB37E2B";
pub const KARMA_ARTIST_NAME: &str = "Alanis Morissette";
pub const KARMA_DURATION: f64 = 326.0;

pub const OTHER_SONG_ID: &str = "SOMZWCG12A8C13C480";
pub const OTHER_ARTIST_ID: &str = "ARD7TVE1187B99BFB1";

// ============================================================================
// Log data
// ============================================================================

pub const USER_ID: &str = "15";
pub const SESSION_ID: i64 = 583;

/// 2018-11-02T01:25:34.796Z
pub const FIRST_PLAY_TS: i64 = 1541121934796;
/// 2018-11-02T01:29:36.796Z
pub const SECOND_PLAY_TS: i64 = 1541122176796;
