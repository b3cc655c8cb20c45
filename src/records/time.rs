use chrono::{DateTime, Datelike, SecondsFormat, Timelike, Utc};

/// Calendar breakdown of a play's start time.
///
/// Derived from the event's epoch-millisecond `ts` in UTC. `week` follows
/// ISO-8601 numbering and `weekday` counts from Monday = 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeRecord {
    pub start_time: DateTime<Utc>,
    pub hour: u32,
    pub day: u32,
    pub week: u32,
    pub month: u32,
    pub year: i32,
    pub weekday: u32,
}

impl TimeRecord {
    /// Returns `None` when `ts` is outside the representable calendar range.
    pub fn from_epoch_millis(ts: i64) -> Option<TimeRecord> {
        let start_time = DateTime::<Utc>::from_timestamp_millis(ts)?;
        Some(TimeRecord {
            start_time,
            hour: start_time.hour(),
            day: start_time.day(),
            week: start_time.iso_week().week(),
            month: start_time.month(),
            year: start_time.year(),
            weekday: start_time.weekday().num_days_from_monday(),
        })
    }
}

/// Text form used for `start_time` columns, e.g. `2018-11-02T01:25:34.796Z`.
pub fn format_start_time(start_time: &DateTime<Utc>) -> String {
    start_time.to_rfc3339_opts(SecondsFormat::Millis, true)
}
