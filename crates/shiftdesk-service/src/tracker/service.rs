//! AUX session tracker service.

use std::sync::Arc;

use shiftdesk_core::result::AppResult;
use shiftdesk_core::traits::Clock;
use shiftdesk_core::types::pagination::{PageRequest, PageResponse};
use shiftdesk_core::types::{AuxSessionId, TimeWindow, UserId};
use shiftdesk_entity::aux_session::model::{AuxSession, CreateAuxSession};
use shiftdesk_entity::aux_session::status::AuxStatus;

use crate::store::SessionStore;

/// Mediates every mutation of a user's AUX sessions.
///
/// The tracker owns the lifecycle contract: at most one open session per
/// user, status switches close the previous session in the same store
/// transaction, and all timestamps come from the injected clock.
#[derive(Clone)]
pub struct AuxTrackerService {
    /// Durable session store.
    store: Arc<dyn SessionStore>,
    /// Time source.
    clock: Arc<dyn Clock>,
}

impl AuxTrackerService {
    /// Creates a new tracker service.
    pub fn new(store: Arc<dyn SessionStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Opens a new session for the user.
    ///
    /// Never auto-closes: if an open session exists the call fails with
    /// `Conflict` and the existing session is untouched. Callers that
    /// want to replace the current status use [`Self::switch_status`].
    pub async fn start_session(
        &self,
        user_id: UserId,
        status: AuxStatus,
        notes: Option<String>,
    ) -> AppResult<AuxSession> {
        self.store
            .create_open(&CreateAuxSession {
                user_id,
                status,
                notes,
                started_at: self.clock.now(),
            })
            .await
    }

    /// Ends the session with the given ID, overwriting notes when
    /// provided.
    pub async fn end_session(
        &self,
        id: AuxSessionId,
        notes: Option<String>,
    ) -> AppResult<AuxSession> {
        self.store.end(id, self.clock.now(), notes.as_deref()).await
    }

    /// Atomically switches the user to a new status.
    ///
    /// The open session (if any) ends at the same instant the new one
    /// starts; there is no point in time with zero or two open sessions.
    pub async fn switch_status(
        &self,
        user_id: UserId,
        new_status: AuxStatus,
        notes: Option<String>,
    ) -> AppResult<AuxSession> {
        tracing::debug!(%user_id, status = %new_status, "Switching AUX status");
        self.store
            .close_open_and_create(&CreateAuxSession {
                user_id,
                status: new_status,
                notes,
                started_at: self.clock.now(),
            })
            .await
    }

    /// Toggles the user's shift.
    ///
    /// Ends the open session when one exists (shift stop), otherwise
    /// opens a `ready` session (shift start). Returns the resulting
    /// session either way.
    pub async fn toggle_shift(
        &self,
        user_id: UserId,
        notes: Option<String>,
    ) -> AppResult<AuxSession> {
        self.store
            .close_open_or_create(user_id, self.clock.now(), notes.as_deref(), AuxStatus::Ready)
            .await
    }

    /// Returns the user's open session, if any.
    pub async fn current_session(&self, user_id: UserId) -> AppResult<Option<AuxSession>> {
        self.store.find_open_by_user(user_id).await
    }

    /// Updates the notes on an open session. Notes freeze when the
    /// session ends.
    pub async fn update_notes(&self, id: AuxSessionId, notes: String) -> AppResult<AuxSession> {
        self.store.update_notes(id, &notes).await
    }

    /// Returns the user's sessions starting inside the window.
    pub async fn session_history(
        &self,
        user_id: UserId,
        window: &TimeWindow,
    ) -> AppResult<Vec<AuxSession>> {
        self.store.list_by_user_and_window(user_id, window).await
    }

    /// Returns recent sessions across all users (admin dashboard).
    pub async fn list_recent(&self, page: &PageRequest) -> AppResult<PageResponse<AuxSession>> {
        self.store.list_recent(page).await
    }

    /// The tracker's current time, for computing live elapsed values in
    /// read paths.
    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;

    use shiftdesk_core::error::ErrorKind;

    use super::*;
    use crate::testing::{InMemorySessionStore, ManualClock};

    fn tracker() -> (AuxTrackerService, Arc<InMemorySessionStore>, Arc<ManualClock>) {
        let store = Arc::new(InMemorySessionStore::new());
        let clock = Arc::new(ManualClock::new());
        let tracker = AuxTrackerService::new(store.clone(), clock.clone());
        (tracker, store, clock)
    }

    #[tokio::test]
    async fn test_start_then_start_is_a_conflict() {
        let (tracker, _, _) = tracker();
        let user = UserId::new();

        tracker
            .start_session(user, AuxStatus::Ready, None)
            .await
            .expect("first start");

        let err = tracker
            .start_session(user, AuxStatus::Personal, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_switch_sequence_keeps_at_most_one_open() {
        let (tracker, store, clock) = tracker();
        let user = UserId::new();

        for status in [
            AuxStatus::Ready,
            AuxStatus::WorkingOnProject,
            AuxStatus::Break,
            AuxStatus::WorkingOnProject,
            AuxStatus::Personal,
        ] {
            tracker
                .switch_status(user, status, None)
                .await
                .expect("switch");
            assert_eq!(store.open_count(user), 1);
            clock.advance(Duration::minutes(10));
        }

        let current = tracker.current_session(user).await.unwrap().unwrap();
        assert_eq!(current.status, AuxStatus::Personal);
    }

    #[tokio::test]
    async fn test_switch_closes_previous_at_new_start() {
        let (tracker, _, clock) = tracker();
        let user = UserId::new();

        let first = tracker
            .switch_status(user, AuxStatus::Ready, None)
            .await
            .unwrap();
        clock.advance(Duration::hours(1));
        let second = tracker
            .switch_status(user, AuxStatus::WorkingOnProject, None)
            .await
            .unwrap();

        let window = TimeWindow::new(first.started_at, second.started_at + Duration::hours(1))
            .unwrap();
        let history = tracker.session_history(user, &window).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].ended_at, Some(second.started_at));
        assert!(history[1].is_open());
    }

    #[tokio::test]
    async fn test_end_session_is_idempotent_failure() {
        let (tracker, store, clock) = tracker();
        let user = UserId::new();

        let session = tracker
            .start_session(user, AuxStatus::Ready, Some("morning".into()))
            .await
            .unwrap();
        clock.advance(Duration::minutes(30));
        let closed = tracker.end_session(session.id, None).await.unwrap();
        assert_eq!(closed.notes.as_deref(), Some("morning"));

        // A second end must fail without touching the record.
        let err = tracker
            .end_session(session.id, Some("tamper".into()))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::AlreadyEnded);

        let stored = store.get(session.id).unwrap();
        assert_eq!(stored.notes.as_deref(), Some("morning"));
        assert_eq!(stored.ended_at, closed.ended_at);
    }

    #[tokio::test]
    async fn test_end_unknown_session_is_not_found() {
        let (tracker, _, _) = tracker();
        let err = tracker
            .end_session(AuxSessionId::new(), None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_double_toggle_round_trip() {
        let (tracker, _, clock) = tracker();
        let user = UserId::new();

        let opened = tracker.toggle_shift(user, None).await.unwrap();
        assert!(opened.is_open());
        assert_eq!(opened.status, AuxStatus::Ready);

        clock.advance(Duration::hours(8));
        let closed = tracker.toggle_shift(user, None).await.unwrap();
        assert_eq!(closed.id, opened.id);
        assert_eq!(
            closed.elapsed_at(clock.now()),
            Duration::hours(8),
            "elapsed must equal the gap between the two toggles"
        );
        assert!(tracker.current_session(user).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_notes_only_while_open() {
        let (tracker, _, _) = tracker();
        let user = UserId::new();

        let session = tracker
            .start_session(user, AuxStatus::WorkingOnProject, None)
            .await
            .unwrap();
        let updated = tracker
            .update_notes(session.id, "sprint board".into())
            .await
            .unwrap();
        assert_eq!(updated.notes.as_deref(), Some("sprint board"));

        tracker.end_session(session.id, None).await.unwrap();
        let err = tracker
            .update_notes(session.id, "too late".into())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::AlreadyEnded);
    }

    #[tokio::test]
    async fn test_end_notes_overwrite_not_append() {
        let (tracker, _, clock) = tracker();
        let user = UserId::new();

        let session = tracker
            .start_session(user, AuxStatus::Break, Some("coffee".into()))
            .await
            .unwrap();
        clock.advance(Duration::minutes(15));
        let closed = tracker
            .end_session(session.id, Some("back at desk".into()))
            .await
            .unwrap();
        assert_eq!(closed.notes.as_deref(), Some("back at desk"));
    }
}
