use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::error::AppError;

/// Parses an RFC 3339 timestamp, a naive `YYYY-MM-DDTHH:MM:SS` (read as UTC)
/// or a bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<Utc>, AppError> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    Err(AppError::validation(format!("{field} is not a valid date: `{raw}`")))
}

/// `October 18, 2026`
pub fn long_date(ts: DateTime<Utc>) -> String {
    ts.format("%B %-d, %Y").to_string()
}
