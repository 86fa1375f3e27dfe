//! Published-date handling: wire strings are ISO dates or date-times, the
//! edit form works on `YYYY-MM-DD`, and the list renders `Mar 5, 2024`.
//! Every conversion reads the calendar date in UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

pub const INPUT_FORMAT: &str = "%Y-%m-%d";
pub const DISPLAY_FORMAT: &str = "%b %-d, %Y";
pub const NOT_AVAILABLE: &str = "N/A";
pub const INVALID_DATE: &str = "Invalid Date";

const NAIVE_DATE_TIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// Parses a wire date into its UTC calendar date.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, INPUT_FORMAT) {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc).date_naive());
    }
    NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|timestamp| timestamp.date())
}

/// Human-readable month/day/year for list rendering.
pub fn format_date(raw: &str) -> String {
    if raw.trim().is_empty() {
        return NOT_AVAILABLE.to_string();
    }
    match parse_calendar_date(raw) {
        Some(date) => date.format(DISPLAY_FORMAT).to_string(),
        None => {
            tracing::error!(date = raw, "invalid date string");
            INVALID_DATE.to_string()
        }
    }
}

/// Date-only value for the edit form. Unparseable input is kept verbatim so
/// the user can correct it instead of losing it.
pub fn to_input_value(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }
    match parse_calendar_date(raw) {
        Some(date) => date.format(INPUT_FORMAT).to_string(),
        None => {
            tracing::warn!(date = raw, "keeping unparseable published date as entered");
            raw.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl CapturedLog {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().expect("log buffer").clone()).expect("utf8 log")
        }
    }

    impl io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("log buffer").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLog {
        type Writer = CapturedLog;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn with_captured_log<T>(f: impl FnOnce() -> T) -> (T, String) {
        let log = CapturedLog::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(log.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();
        let out = tracing::subscriber::with_default(subscriber, f);
        (out, log.contents())
    }

    #[test]
    fn malformed_date_logs_an_error_naming_the_input() {
        let (label, log) = with_captured_log(|| format_date("not-a-date"));
        assert_eq!(label, "Invalid Date");
        assert!(log.contains("ERROR"), "{log}");
        assert!(log.contains("not-a-date"), "{log}");

        let (_, log) = with_captured_log(|| format_date("2024-03-05"));
        assert!(!log.contains("ERROR"), "{log}");
    }

    #[test]
    fn formats_empty_plain_and_malformed_dates() {
        assert_eq!(format_date(""), "N/A");
        assert_eq!(format_date("2024-03-05"), "Mar 5, 2024");
        assert_eq!(format_date("not-a-date"), "Invalid Date");
    }

    #[test]
    fn formats_full_timestamps_in_utc() {
        assert_eq!(format_date("2024-03-05T00:00:00.000Z"), "Mar 5, 2024");
        assert_eq!(format_date("2024-03-05T23:30:00-02:00"), "Mar 6, 2024");
        assert_eq!(format_date("1999-12-31T08:15:00"), "Dec 31, 1999");
    }

    #[test]
    fn input_value_is_date_only() {
        assert_eq!(to_input_value("2021-11-02T00:00:00.000Z"), "2021-11-02");
        assert_eq!(to_input_value("2021-11-02"), "2021-11-02");
        assert_eq!(to_input_value(""), "");
    }

    #[test]
    fn input_value_keeps_unparseable_text() {
        assert_eq!(to_input_value("sometime in 1990"), "sometime in 1990");
    }
}
