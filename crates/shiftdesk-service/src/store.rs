//! The durable session store the tracker operates against.
//!
//! The trait is the seam between business logic and persistence: the
//! PostgreSQL repository implements it in production, and tests swap in
//! an in-memory store. Implementations must keep the composite
//! primitives (`close_open_and_create`, `close_open_or_create`) atomic —
//! a transaction or a lock — so the one-open-session-per-user invariant
//! cannot be violated by concurrent callers, and must surface a
//! unique-violation on insert as a `Conflict` error.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use shiftdesk_core::result::AppResult;
use shiftdesk_core::types::pagination::{PageRequest, PageResponse};
use shiftdesk_core::types::{AuxSessionId, TimeWindow, UserId};
use shiftdesk_database::repositories::AuxSessionRepository;
use shiftdesk_entity::aux_session::model::{AuxSession, CreateAuxSession};
use shiftdesk_entity::aux_session::status::AuxStatus;

/// Durable store for AUX sessions.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Insert a new open session; `Conflict` when one is already open.
    async fn create_open(&self, data: &CreateAuxSession) -> AppResult<AuxSession>;

    /// Find a session by ID.
    async fn find_by_id(&self, id: AuxSessionId) -> AppResult<Option<AuxSession>>;

    /// Find the open session for a user, if any.
    async fn find_open_by_user(&self, user_id: UserId) -> AppResult<Option<AuxSession>>;

    /// Close the session with the given ID, overwriting notes when
    /// provided. `NotFound` / `AlreadyEnded` on failure, with the stored
    /// record left unchanged.
    async fn end(
        &self,
        id: AuxSessionId,
        ended_at: DateTime<Utc>,
        notes: Option<&str>,
    ) -> AppResult<AuxSession>;

    /// Atomically close the user's open session (if any) and insert the
    /// replacement described by `data`.
    async fn close_open_and_create(&self, data: &CreateAuxSession) -> AppResult<AuxSession>;

    /// Atomically close the user's open session, or insert a new open one
    /// with `fallback_status` when nothing was open.
    async fn close_open_or_create(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
        notes: Option<&str>,
        fallback_status: AuxStatus,
    ) -> AppResult<AuxSession>;

    /// Update the notes on an open session.
    async fn update_notes(&self, id: AuxSessionId, notes: &str) -> AppResult<AuxSession>;

    /// List a user's sessions starting inside the window, oldest first.
    async fn list_by_user_and_window(
        &self,
        user_id: UserId,
        window: &TimeWindow,
    ) -> AppResult<Vec<AuxSession>>;

    /// List all users' sessions starting inside the window, oldest first.
    async fn list_by_window(&self, window: &TimeWindow) -> AppResult<Vec<AuxSession>>;

    /// List recent sessions with pagination.
    async fn list_recent(&self, page: &PageRequest) -> AppResult<PageResponse<AuxSession>>;
}

#[async_trait]
impl SessionStore for AuxSessionRepository {
    async fn create_open(&self, data: &CreateAuxSession) -> AppResult<AuxSession> {
        AuxSessionRepository::create_open(self, data).await
    }

    async fn find_by_id(&self, id: AuxSessionId) -> AppResult<Option<AuxSession>> {
        AuxSessionRepository::find_by_id(self, id).await
    }

    async fn find_open_by_user(&self, user_id: UserId) -> AppResult<Option<AuxSession>> {
        AuxSessionRepository::find_open_by_user(self, user_id).await
    }

    async fn end(
        &self,
        id: AuxSessionId,
        ended_at: DateTime<Utc>,
        notes: Option<&str>,
    ) -> AppResult<AuxSession> {
        AuxSessionRepository::end(self, id, ended_at, notes).await
    }

    async fn close_open_and_create(&self, data: &CreateAuxSession) -> AppResult<AuxSession> {
        AuxSessionRepository::close_open_and_create(self, data).await
    }

    async fn close_open_or_create(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
        notes: Option<&str>,
        fallback_status: AuxStatus,
    ) -> AppResult<AuxSession> {
        AuxSessionRepository::close_open_or_create(self, user_id, now, notes, fallback_status)
            .await
    }

    async fn update_notes(&self, id: AuxSessionId, notes: &str) -> AppResult<AuxSession> {
        AuxSessionRepository::update_notes(self, id, notes).await
    }

    async fn list_by_user_and_window(
        &self,
        user_id: UserId,
        window: &TimeWindow,
    ) -> AppResult<Vec<AuxSession>> {
        AuxSessionRepository::list_by_user_and_window(self, user_id, window).await
    }

    async fn list_by_window(&self, window: &TimeWindow) -> AppResult<Vec<AuxSession>> {
        AuxSessionRepository::list_by_window(self, window).await
    }

    async fn list_recent(&self, page: &PageRequest) -> AppResult<PageResponse<AuxSession>> {
        AuxSessionRepository::list_recent(self, page).await
    }
}
