//! Timestamp helpers
//!
//! All persisted timestamps are Unix epoch milliseconds (i64). Export filters
//! accept `YYYY-MM-DD` dates and expand them to inclusive day boundaries.

use chrono::{DateTime, NaiveDate, Utc};

/// Current time as epoch milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Start of the given `YYYY-MM-DD` day (00:00:00.000) as epoch millis
pub fn day_start_millis(date: &str) -> Option<i64> {
    let d = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    Some(d.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis())
}

/// End of the given `YYYY-MM-DD` day (23:59:59.999) as epoch millis
pub fn day_end_millis(date: &str) -> Option<i64> {
    let d = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    Some(d.and_hms_milli_opt(23, 59, 59, 999)?.and_utc().timestamp_millis())
}

/// Format epoch millis for report display (`DD/MM/YYYY HH:MM`)
pub fn format_millis(millis: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(millis) {
        Some(dt) => dt.format("%d/%m/%Y %H:%M").to_string(),
        None => String::new(),
    }
}

/// Today's date stamp for attachment filenames (`YYYY-MM-DD`)
pub fn today_stamp() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}
