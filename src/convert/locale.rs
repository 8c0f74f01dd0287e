use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;

// fr-FR layouts: 01/02/2024 and 13:05:09
const DATE_FORMAT: &str = "%d/%m/%Y";
const TIME_FORMAT: &str = "%H:%M:%S";

fn local(tz: Tz, millis: i64) -> Option<DateTime<Tz>> {
    tz.timestamp_millis_opt(millis).single()
}

/// Formats the calendar date of `millis` (ms since the epoch) in `tz`.
pub(crate) fn date(tz: Tz, millis: i64) -> String {
    match local(tz, millis) {
        Some(t) => t.format(DATE_FORMAT).to_string(),
        None => {
            warn!("Timestamp {} is out of range", millis);
            String::new()
        }
    }
}

/// Formats the wall-clock time of `millis` (ms since the epoch) in `tz`.
pub(crate) fn time(tz: Tz, millis: i64) -> String {
    match local(tz, millis) {
        Some(t) => t.format(TIME_FORMAT).to_string(),
        None => {
            warn!("Timestamp {} is out of range", millis);
            String::new()
        }
    }
}
