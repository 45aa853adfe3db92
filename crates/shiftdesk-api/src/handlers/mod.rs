//! HTTP request handlers.

pub mod aux_session;
pub mod health;
pub mod report;

use chrono::{DateTime, Utc};

use shiftdesk_core::error::AppError;
use shiftdesk_core::types::TimeWindow;

use crate::dto::request::WindowQuery;

/// Default report window when neither bound is given.
const DEFAULT_WINDOW_DAYS: i64 = 7;

/// Resolves `from`/`to` query parameters into a validated time window.
///
/// Missing bounds default to the trailing week ending at `now`.
pub(crate) fn parse_window(query: &WindowQuery, now: DateTime<Utc>) -> Result<TimeWindow, AppError> {
    let start = match &query.from {
        Some(raw) => parse_timestamp(raw)?,
        None => now - chrono::Duration::days(DEFAULT_WINDOW_DAYS),
    };
    let end = match &query.to {
        Some(raw) => parse_timestamp(raw)?,
        None => now,
    };
    TimeWindow::new(start, end)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::validation(format!("Invalid RFC 3339 timestamp '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use shiftdesk_core::error::ErrorKind;

    use super::*;

    #[test]
    fn test_default_window_is_trailing_week() {
        let now = Utc::now();
        let query = WindowQuery {
            from: None,
            to: None,
        };
        let window = parse_window(&query, now).unwrap();
        assert_eq!(window.end, now);
        assert_eq!(window.end - window.start, chrono::Duration::days(7));
    }

    #[test]
    fn test_malformed_timestamp_is_a_validation_error() {
        let query = WindowQuery {
            from: Some("yesterday".to_string()),
            to: None,
        };
        let err = parse_window(&query, Utc::now()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_inverted_window_is_rejected() {
        let now = Utc::now();
        let query = WindowQuery {
            from: Some(now.to_rfc3339()),
            to: Some((now - chrono::Duration::hours(1)).to_rfc3339()),
        };
        let err = parse_window(&query, now).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
