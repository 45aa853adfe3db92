//! AUX session repository implementation.
//!
//! The one-open-session-per-user invariant lives in the database: a
//! partial unique index guards inserts, and every close is a conditional
//! `UPDATE ... WHERE ended_at IS NULL`. Composite operations (switch,
//! toggle) run inside a single transaction. Timestamps are always passed
//! in by the caller; this module never reads the wall clock.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use shiftdesk_core::error::{AppError, ErrorKind};
use shiftdesk_core::result::AppResult;
use shiftdesk_core::types::pagination::{PageRequest, PageResponse};
use shiftdesk_core::types::{AuxSessionId, TimeWindow, UserId};
use shiftdesk_entity::aux_session::model::{AuxSession, CreateAuxSession};
use shiftdesk_entity::aux_session::status::AuxStatus;

/// Name of the partial unique index enforcing the open-session invariant.
const ONE_OPEN_INDEX: &str = "aux_sessions_one_open_per_user";

/// Repository for AUX session CRUD and the atomic lifecycle primitives.
#[derive(Debug, Clone)]
pub struct AuxSessionRepository {
    pool: PgPool,
}

impl AuxSessionRepository {
    /// Create a new AUX session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a session by ID.
    pub async fn find_by_id(&self, id: AuxSessionId) -> AppResult<Option<AuxSession>> {
        sqlx::query_as::<_, AuxSession>("SELECT * FROM aux_sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find session", e))
    }

    /// Find the open session for a user, if any.
    pub async fn find_open_by_user(&self, user_id: UserId) -> AppResult<Option<AuxSession>> {
        sqlx::query_as::<_, AuxSession>(
            "SELECT * FROM aux_sessions WHERE user_id = $1 AND ended_at IS NULL",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find open session", e))
    }

    /// Insert a new open session.
    ///
    /// Fails with a `Conflict` error when the user already has an open
    /// session (partial unique index violation); the existing record is
    /// left untouched.
    pub async fn create_open(&self, data: &CreateAuxSession) -> AppResult<AuxSession> {
        sqlx::query_as::<_, AuxSession>(
            "INSERT INTO aux_sessions (user_id, status, notes, started_at) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(data.user_id)
        .bind(data.status)
        .bind(&data.notes)
        .bind(data.started_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_create_error)
    }

    /// Close the session with the given ID.
    ///
    /// Overwrites notes when `notes` is provided. The end timestamp is
    /// clamped so it never precedes the start. Fails with `NotFound` for
    /// an unknown ID and `AlreadyEnded` for a closed session; a failed
    /// call leaves the record unchanged.
    pub async fn end(
        &self,
        id: AuxSessionId,
        ended_at: DateTime<Utc>,
        notes: Option<&str>,
    ) -> AppResult<AuxSession> {
        let closed = sqlx::query_as::<_, AuxSession>(
            "UPDATE aux_sessions \
             SET ended_at = GREATEST(started_at, $2), notes = COALESCE($3, notes) \
             WHERE id = $1 AND ended_at IS NULL RETURNING *",
        )
        .bind(id)
        .bind(ended_at)
        .bind(notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to end session", e))?;

        match closed {
            Some(session) => Ok(session),
            None => match self.find_by_id(id).await? {
                Some(_) => Err(AppError::already_ended(format!(
                    "Session {id} has already been ended"
                ))),
                None => Err(AppError::not_found(format!("Session {id} not found"))),
            },
        }
    }

    /// Atomically close the user's open session (if any) and insert the
    /// replacement described by `data`, all in one transaction.
    ///
    /// The previous session ends exactly when the new one starts.
    pub async fn close_open_and_create(&self, data: &CreateAuxSession) -> AppResult<AuxSession> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        sqlx::query(
            "UPDATE aux_sessions SET ended_at = GREATEST(started_at, $2) \
             WHERE user_id = $1 AND ended_at IS NULL",
        )
        .bind(data.user_id)
        .bind(data.started_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to close previous session", e)
        })?;

        let session = sqlx::query_as::<_, AuxSession>(
            "INSERT INTO aux_sessions (user_id, status, notes, started_at) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(data.user_id)
        .bind(data.status)
        .bind(&data.notes)
        .bind(data.started_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_create_error)?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit status switch", e)
        })?;

        Ok(session)
    }

    /// Atomically close the user's open session, or insert a new open one
    /// with `fallback_status` when nothing was open (shift toggle).
    pub async fn close_open_or_create(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
        notes: Option<&str>,
        fallback_status: AuxStatus,
    ) -> AppResult<AuxSession> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let closed = sqlx::query_as::<_, AuxSession>(
            "UPDATE aux_sessions \
             SET ended_at = GREATEST(started_at, $2), notes = COALESCE($3, notes) \
             WHERE user_id = $1 AND ended_at IS NULL RETURNING *",
        )
        .bind(user_id)
        .bind(now)
        .bind(notes)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to close open session", e)
        })?;

        let session = match closed {
            Some(session) => session,
            None => sqlx::query_as::<_, AuxSession>(
                "INSERT INTO aux_sessions (user_id, status, notes, started_at) \
                 VALUES ($1, $2, $3, $4) RETURNING *",
            )
            .bind(user_id)
            .bind(fallback_status)
            .bind(notes)
            .bind(now)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_create_error)?,
        };

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit shift toggle", e)
        })?;

        Ok(session)
    }

    /// Update the notes on an open session.
    ///
    /// Notes are frozen once the session ends: `AlreadyEnded` for a
    /// closed session, `NotFound` for an unknown ID.
    pub async fn update_notes(&self, id: AuxSessionId, notes: &str) -> AppResult<AuxSession> {
        let updated = sqlx::query_as::<_, AuxSession>(
            "UPDATE aux_sessions SET notes = $2 WHERE id = $1 AND ended_at IS NULL RETURNING *",
        )
        .bind(id)
        .bind(notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update notes", e))?;

        match updated {
            Some(session) => Ok(session),
            None => match self.find_by_id(id).await? {
                Some(_) => Err(AppError::already_ended(format!(
                    "Session {id} has already been ended"
                ))),
                None => Err(AppError::not_found(format!("Session {id} not found"))),
            },
        }
    }

    /// List a user's sessions whose start falls inside the window,
    /// oldest first.
    pub async fn list_by_user_and_window(
        &self,
        user_id: UserId,
        window: &TimeWindow,
    ) -> AppResult<Vec<AuxSession>> {
        sqlx::query_as::<_, AuxSession>(
            "SELECT * FROM aux_sessions \
             WHERE user_id = $1 AND started_at >= $2 AND started_at < $3 \
             ORDER BY started_at ASC",
        )
        .bind(user_id)
        .bind(window.start)
        .bind(window.end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list user sessions", e))
    }

    /// List all users' sessions whose start falls inside the window,
    /// oldest first.
    pub async fn list_by_window(&self, window: &TimeWindow) -> AppResult<Vec<AuxSession>> {
        sqlx::query_as::<_, AuxSession>(
            "SELECT * FROM aux_sessions \
             WHERE started_at >= $1 AND started_at < $2 \
             ORDER BY started_at ASC",
        )
        .bind(window.start)
        .bind(window.end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list sessions", e))
    }

    /// List recent sessions with pagination (admin dashboard).
    pub async fn list_recent(&self, page: &PageRequest) -> AppResult<PageResponse<AuxSession>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM aux_sessions")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count sessions", e)
            })?;

        let sessions = sqlx::query_as::<_, AuxSession>(
            "SELECT * FROM aux_sessions ORDER BY started_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list sessions", e))?;

        Ok(PageResponse::new(
            sessions,
            page.page,
            page.page_size,
            total as u64,
        ))
    }
}

/// Map insert failures, translating the open-session unique violation
/// into a stable `Conflict`.
fn map_create_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if db.constraint() == Some(ONE_OPEN_INDEX) {
            return AppError::conflict("An open AUX session already exists for this user");
        }
    }
    AppError::with_source(ErrorKind::Database, "Failed to create session", e)
}
