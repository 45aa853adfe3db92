//! AUX session entity model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use shiftdesk_core::types::{AuxSessionId, UserId};

use crate::aux_session::status::AuxStatus;

/// A timestamped record of a user's declared work status.
///
/// A session is *open* while `ended_at` is absent; at most one session
/// per user is open at any time. Notes stay mutable until the session
/// ends.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuxSession {
    /// Unique session identifier.
    pub id: AuxSessionId,
    /// The user this session belongs to.
    pub user_id: UserId,
    /// Declared work status.
    pub status: AuxStatus,
    /// Optional free-text annotation.
    pub notes: Option<String>,
    /// When the session started. Immutable after creation.
    pub started_at: DateTime<Utc>,
    /// When the session ended; `None` while open. Always `>= started_at`.
    pub ended_at: Option<DateTime<Utc>>,
}

impl AuxSession {
    /// Whether the session is still open.
    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }

    /// Elapsed duration at the given instant.
    ///
    /// Open sessions measure up to `now`; closed sessions are constant
    /// regardless of `now`. Clock skew (now before start) clamps to zero.
    pub fn elapsed_at(&self, now: DateTime<Utc>) -> Duration {
        let end = self.ended_at.unwrap_or(now);
        (end - self.started_at).max(Duration::zero())
    }
}

/// Data required to open a new AUX session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAuxSession {
    /// The user this session belongs to.
    pub user_id: UserId,
    /// Declared work status.
    pub status: AuxStatus,
    /// Optional free-text annotation.
    pub notes: Option<String>,
    /// Session start timestamp.
    pub started_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_session(started_at: DateTime<Utc>) -> AuxSession {
        AuxSession {
            id: AuxSessionId::new(),
            user_id: UserId::new(),
            status: AuxStatus::Ready,
            notes: None,
            started_at,
            ended_at: None,
        }
    }

    #[test]
    fn test_open_session_elapsed_grows_with_now() {
        let start = Utc::now();
        let session = open_session(start);

        let e1 = session.elapsed_at(start + Duration::minutes(5));
        let e2 = session.elapsed_at(start + Duration::minutes(10));
        assert_eq!(e1, Duration::minutes(5));
        assert!(e2 > e1);
    }

    #[test]
    fn test_closed_session_elapsed_is_constant() {
        let start = Utc::now();
        let mut session = open_session(start);
        session.ended_at = Some(start + Duration::hours(2));

        assert_eq!(session.elapsed_at(start), Duration::hours(2));
        assert_eq!(
            session.elapsed_at(start + Duration::days(30)),
            Duration::hours(2)
        );
    }

    #[test]
    fn test_clock_skew_clamps_to_zero() {
        let start = Utc::now();
        let session = open_session(start);
        assert_eq!(
            session.elapsed_at(start - Duration::minutes(1)),
            Duration::zero()
        );
    }
}
