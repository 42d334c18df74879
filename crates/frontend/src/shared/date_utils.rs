//! Date and datetime formatting for inputs and list cells.
//!
//! Backend values arrive either as bare dates or as timestamps, possibly
//! UTC-normalized. Inputs always show local calendar components: a UTC
//! midnight naively sliced would display as the previous local day, so
//! offset-carrying timestamps are converted to local time first and bare
//! dates pass through untouched (anchored to local midnight).

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

fn parse_naive(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .ok()
}

fn bare_date(raw: &str) -> Option<&str> {
    let date_part = raw.split('T').next().unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .ok()
        .map(|_| date_part)
}

/// Value for an `<input type="date">`: `YYYY-MM-DD`.
pub fn date_input_value(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Local).format("%Y-%m-%d").to_string();
    }
    if let Some(ndt) = parse_naive(raw) {
        return ndt.format("%Y-%m-%d").to_string();
    }
    match bare_date(raw) {
        Some(d) => d.to_string(),
        None => raw.to_string(),
    }
}

/// Value for an `<input type="datetime-local">`: `YYYY-MM-DDTHH:MM`.
pub fn datetime_input_value(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Local).format("%Y-%m-%dT%H:%M").to_string();
    }
    if let Some(ndt) = parse_naive(raw) {
        return ndt.format("%Y-%m-%dT%H:%M").to_string();
    }
    match bare_date(raw) {
        Some(d) => format!("{}T00:00", d),
        None => raw.to_string(),
    }
}

/// List-cell rendering: `DD/MM/YYYY`.
pub fn format_date_br(raw: &str) -> String {
    let value = date_input_value(raw);
    let mut parts = value.splitn(3, '-');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(y), Some(m), Some(d)) if y.len() == 4 => format!("{}/{}/{}", d, m, y),
        _ => value,
    }
}

/// List-cell rendering: `DD/MM/YYYY HH:MM`.
pub fn format_datetime_br(raw: &str) -> String {
    let value = datetime_input_value(raw);
    match value.split_once('T') {
        Some((date, time)) => format!("{} {}", format_date_br(date), time),
        None => format_date_br(&value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_date_is_never_shifted() {
        assert_eq!(date_input_value("2025-03-10"), "2025-03-10");
        assert_eq!(datetime_input_value("2025-03-10"), "2025-03-10T00:00");
    }

    #[test]
    fn naive_timestamp_keeps_components() {
        assert_eq!(date_input_value("2025-03-10T14:30:00"), "2025-03-10");
        assert_eq!(datetime_input_value("2025-03-10T14:30:00"), "2025-03-10T14:30");
        assert_eq!(datetime_input_value("2025-03-10T14:30:00.123456"), "2025-03-10T14:30");
    }

    #[test]
    fn empty_and_garbage_pass_through() {
        assert_eq!(date_input_value(""), "");
        assert_eq!(date_input_value("invalid"), "invalid");
    }

    #[test]
    fn brazilian_display_format() {
        assert_eq!(format_date_br("2025-03-10"), "10/03/2025");
        assert_eq!(format_datetime_br("2025-03-10T14:30:00"), "10/03/2025 14:30");
    }
}
