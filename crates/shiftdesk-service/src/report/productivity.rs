//! Productivity aggregation over AUX session history.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shiftdesk_core::result::AppResult;
use shiftdesk_core::traits::Clock;
use shiftdesk_core::types::{TimeWindow, UserId};
use shiftdesk_entity::aux_session::model::AuxSession;
use shiftdesk_entity::aux_session::status::AuxStatus;

use crate::store::SessionStore;

/// Time spent in one status within a report window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusBreakdown {
    /// Hours spent in this status.
    pub hours: f64,
    /// Share of the window total, in percent.
    pub percentage: f64,
}

/// Aggregated productivity figures for a time window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductivityReport {
    /// Window start (inclusive).
    pub window_start: DateTime<Utc>,
    /// Window end (exclusive).
    pub window_end: DateTime<Utc>,
    /// Total tracked hours across all statuses.
    pub total_hours: f64,
    /// Per-status time distribution.
    pub by_status: BTreeMap<AuxStatus, StatusBreakdown>,
    /// Share of tracked time spent working on a project, in percent.
    pub productivity_percent: f64,
}

/// Aggregates sessions into a productivity report.
///
/// Sessions whose start falls outside the window are excluded entirely
/// (no clipping). A still-open session is measured up to `now`. All
/// figures round to two decimals; an empty window yields zero totals and
/// an empty breakdown rather than a division by zero.
pub fn aggregate(
    sessions: &[AuxSession],
    window: &TimeWindow,
    now: DateTime<Utc>,
) -> ProductivityReport {
    let mut seconds_by_status: BTreeMap<AuxStatus, i64> = BTreeMap::new();
    for session in sessions {
        if !window.contains(session.started_at) {
            continue;
        }
        *seconds_by_status.entry(session.status).or_insert(0) +=
            session.elapsed_at(now).num_seconds();
    }

    let total_seconds: i64 = seconds_by_status.values().sum();
    let mut productive_seconds: i64 = 0;

    let by_status = seconds_by_status
        .into_iter()
        .map(|(status, seconds)| {
            if status.is_productive() {
                productive_seconds += seconds;
            }
            let breakdown = StatusBreakdown {
                hours: round2(seconds as f64 / 3600.0),
                percentage: percentage_of(seconds, total_seconds),
            };
            (status, breakdown)
        })
        .collect();

    ProductivityReport {
        window_start: window.start,
        window_end: window.end,
        total_hours: round2(total_seconds as f64 / 3600.0),
        by_status,
        productivity_percent: percentage_of(productive_seconds, total_seconds),
    }
}

/// Computes productivity reports from stored session history.
#[derive(Clone)]
pub struct ProductivityService {
    /// Durable session store.
    store: Arc<dyn SessionStore>,
    /// Time source for measuring the open session.
    clock: Arc<dyn Clock>,
}

impl ProductivityService {
    /// Creates a new productivity service.
    pub fn new(store: Arc<dyn SessionStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Report for a single user's sessions in the window.
    pub async fn report_for_user(
        &self,
        user_id: UserId,
        window: &TimeWindow,
    ) -> AppResult<ProductivityReport> {
        let sessions = self.store.list_by_user_and_window(user_id, window).await?;
        Ok(aggregate(&sessions, window, self.clock.now()))
    }

    /// Report across all users' sessions in the window (admin dashboard).
    pub async fn report_all(&self, window: &TimeWindow) -> AppResult<ProductivityReport> {
        let sessions = self.store.list_by_window(window).await?;
        Ok(aggregate(&sessions, window, self.clock.now()))
    }
}

/// `part / total` in percent, rounded to two decimals; 0 when the total
/// is zero.
fn percentage_of(part: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(part as f64 / total as f64 * 100.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use shiftdesk_core::types::AuxSessionId;

    use super::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap()
    }

    fn session(
        status: AuxStatus,
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
    ) -> AuxSession {
        AuxSession {
            id: AuxSessionId::new(),
            user_id: UserId::new(),
            status,
            notes: None,
            started_at: start,
            ended_at: end,
        }
    }

    #[test]
    fn test_empty_input_yields_zero_report() {
        let window = TimeWindow::new(t0(), t0() + Duration::days(1)).unwrap();
        let report = aggregate(&[], &window, t0());

        assert_eq!(report.total_hours, 0.0);
        assert!(report.by_status.is_empty());
        assert_eq!(report.productivity_percent, 0.0);
    }

    #[test]
    fn test_one_third_ready_two_thirds_working() {
        let start = t0();
        let sessions = vec![
            session(AuxStatus::Ready, start, Some(start + Duration::hours(1))),
            session(
                AuxStatus::WorkingOnProject,
                start + Duration::hours(1),
                Some(start + Duration::hours(3)),
            ),
        ];
        let window = TimeWindow::new(start, start + Duration::days(1)).unwrap();
        let report = aggregate(&sessions, &window, start + Duration::hours(3));

        assert_eq!(report.total_hours, 3.0);
        assert_eq!(report.by_status[&AuxStatus::Ready].hours, 1.0);
        assert_eq!(report.by_status[&AuxStatus::Ready].percentage, 33.33);
        assert_eq!(report.by_status[&AuxStatus::WorkingOnProject].hours, 2.0);
        assert_eq!(
            report.by_status[&AuxStatus::WorkingOnProject].percentage,
            66.67
        );
        assert_eq!(report.productivity_percent, 66.67);
    }

    #[test]
    fn test_open_session_is_measured_to_now() {
        let start = t0();
        let sessions = vec![session(AuxStatus::WorkingOnProject, start, None)];
        let window = TimeWindow::new(start, start + Duration::days(1)).unwrap();
        let report = aggregate(&sessions, &window, start + Duration::minutes(90));

        assert_eq!(report.total_hours, 1.5);
        assert_eq!(report.productivity_percent, 100.0);
    }

    #[test]
    fn test_sessions_outside_window_are_excluded_entirely() {
        let start = t0();
        let sessions = vec![
            // Starts before the window but overlaps it: excluded, no clipping.
            session(
                AuxStatus::WorkingOnProject,
                start - Duration::hours(2),
                Some(start + Duration::hours(2)),
            ),
            session(AuxStatus::Break, start, Some(start + Duration::hours(1))),
        ];
        let window = TimeWindow::new(start, start + Duration::days(1)).unwrap();
        let report = aggregate(&sessions, &window, start + Duration::days(1));

        assert_eq!(report.total_hours, 1.0);
        assert!(!report.by_status.contains_key(&AuxStatus::WorkingOnProject));
    }

    #[tokio::test]
    async fn test_report_for_user_only_counts_that_user() {
        use std::sync::Arc;

        use shiftdesk_entity::aux_session::model::CreateAuxSession;

        use crate::testing::{InMemorySessionStore, ManualClock};

        let store = Arc::new(InMemorySessionStore::new());
        let clock = Arc::new(ManualClock::new());
        let service = ProductivityService::new(store.clone(), clock.clone());

        let alice = UserId::new();
        let bob = UserId::new();
        let start = clock.now();

        store
            .create_open(&CreateAuxSession {
                user_id: alice,
                status: AuxStatus::WorkingOnProject,
                notes: None,
                started_at: start,
            })
            .await
            .unwrap();
        store
            .create_open(&CreateAuxSession {
                user_id: bob,
                status: AuxStatus::Break,
                notes: None,
                started_at: start,
            })
            .await
            .unwrap();
        clock.advance(Duration::hours(2));

        let window = TimeWindow::new(start, clock.now() + Duration::seconds(1)).unwrap();
        let report = service.report_for_user(alice, &window).await.unwrap();
        assert_eq!(report.total_hours, 2.0);
        assert_eq!(report.productivity_percent, 100.0);

        let all = service.report_all(&window).await.unwrap();
        assert_eq!(all.total_hours, 4.0);
        assert_eq!(all.productivity_percent, 50.0);
    }

    #[test]
    fn test_sums_multiple_sessions_per_status() {
        let start = t0();
        let sessions = vec![
            session(AuxStatus::Break, start, Some(start + Duration::minutes(15))),
            session(
                AuxStatus::Break,
                start + Duration::hours(4),
                Some(start + Duration::hours(4) + Duration::minutes(30)),
            ),
            session(
                AuxStatus::WorkingOnProject,
                start + Duration::hours(1),
                Some(start + Duration::hours(3)),
            ),
        ];
        let window = TimeWindow::new(start, start + Duration::days(1)).unwrap();
        let report = aggregate(&sessions, &window, start + Duration::days(1));

        assert_eq!(report.by_status[&AuxStatus::Break].hours, 0.75);
        assert_eq!(report.total_hours, 2.75);
        assert_eq!(report.productivity_percent, 72.73);
    }
}
