//! Time window used by history queries and productivity reports.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A half-open time interval `[start, end)`.
///
/// Sessions belong to a window when their start timestamp falls inside
/// it; a session is never split across window boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Inclusive lower bound.
    pub start: DateTime<Utc>,
    /// Exclusive upper bound.
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Create a window, rejecting inverted bounds.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, AppError> {
        if start > end {
            return Err(AppError::validation(format!(
                "Invalid time window: start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// The trailing `days` ending at `now`.
    pub fn last_days(now: DateTime<Utc>, days: i64) -> Self {
        Self {
            start: now - Duration::days(days),
            end: now,
        }
    }

    /// Whether `ts` lies inside the window.
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start && ts < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_inverted_bounds() {
        let now = Utc::now();
        let err = TimeWindow::new(now, now - Duration::hours(1)).unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Validation);
    }

    #[test]
    fn test_half_open_contains() {
        let now = Utc::now();
        let window = TimeWindow::new(now, now + Duration::hours(1)).unwrap();
        assert!(window.contains(now));
        assert!(!window.contains(now + Duration::hours(1)));
        assert!(!window.contains(now - Duration::seconds(1)));
    }

    #[test]
    fn test_last_days() {
        let now = Utc::now();
        let window = TimeWindow::last_days(now, 7);
        assert_eq!(window.end, now);
        assert_eq!(window.end - window.start, Duration::days(7));
    }
}
