use chrono::{NaiveDate, SecondsFormat, Utc};

/// Calendar date of the current instant in UTC. All scheduler comparisons
/// are date-only; time-of-day is dropped here, at the edge.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn now_utc_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
