//! Test doubles: an in-memory session store and a manually advanced
//! clock. The store mirrors the repository's semantics, including the
//! one-open-session-per-user invariant and notes freezing on close.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use shiftdesk_core::error::AppError;
use shiftdesk_core::result::AppResult;
use shiftdesk_core::traits::Clock;
use shiftdesk_core::types::pagination::{PageRequest, PageResponse};
use shiftdesk_core::types::{AuxSessionId, TimeWindow, UserId};
use shiftdesk_entity::aux_session::model::{AuxSession, CreateAuxSession};
use shiftdesk_entity::aux_session::status::AuxStatus;

use crate::store::SessionStore;

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Utc::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Mutex-serialized in-memory [`SessionStore`].
pub struct InMemorySessionStore {
    sessions: Mutex<Vec<AuxSession>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(Vec::new()),
        }
    }

    /// Fetch a stored session by ID.
    pub fn get(&self, id: AuxSessionId) -> Option<AuxSession> {
        self.sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }

    /// Number of open sessions stored for the user.
    pub fn open_count(&self, user_id: UserId) -> usize {
        self.sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id == user_id && s.is_open())
            .count()
    }

    fn insert_open(
        sessions: &mut Vec<AuxSession>,
        data: &CreateAuxSession,
    ) -> AppResult<AuxSession> {
        if sessions.iter().any(|s| s.user_id == data.user_id && s.is_open()) {
            return Err(AppError::conflict(
                "An open AUX session already exists for this user",
            ));
        }
        let session = AuxSession {
            id: AuxSessionId::new(),
            user_id: data.user_id,
            status: data.status,
            notes: data.notes.clone(),
            started_at: data.started_at,
            ended_at: None,
        };
        sessions.push(session.clone());
        Ok(session)
    }

    fn close(session: &mut AuxSession, ended_at: DateTime<Utc>, notes: Option<&str>) {
        session.ended_at = Some(ended_at.max(session.started_at));
        if let Some(notes) = notes {
            session.notes = Some(notes.to_string());
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create_open(&self, data: &CreateAuxSession) -> AppResult<AuxSession> {
        let mut sessions = self.sessions.lock().unwrap();
        Self::insert_open(&mut sessions, data)
    }

    async fn find_by_id(&self, id: AuxSessionId) -> AppResult<Option<AuxSession>> {
        Ok(self.get(id))
    }

    async fn find_open_by_user(&self, user_id: UserId) -> AppResult<Option<AuxSession>> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.user_id == user_id && s.is_open())
            .cloned())
    }

    async fn end(
        &self,
        id: AuxSessionId,
        ended_at: DateTime<Utc>,
        notes: Option<&str>,
    ) -> AppResult<AuxSession> {
        let mut sessions = self.sessions.lock().unwrap();
        match sessions.iter_mut().find(|s| s.id == id) {
            Some(session) if session.is_open() => {
                Self::close(session, ended_at, notes);
                Ok(session.clone())
            }
            Some(_) => Err(AppError::already_ended(format!(
                "Session {id} has already been ended"
            ))),
            None => Err(AppError::not_found(format!("Session {id} not found"))),
        }
    }

    async fn close_open_and_create(&self, data: &CreateAuxSession) -> AppResult<AuxSession> {
        let mut sessions = self.sessions.lock().unwrap();
        if let Some(open) = sessions
            .iter_mut()
            .find(|s| s.user_id == data.user_id && s.is_open())
        {
            Self::close(open, data.started_at, None);
        }
        Self::insert_open(&mut sessions, data)
    }

    async fn close_open_or_create(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
        notes: Option<&str>,
        fallback_status: AuxStatus,
    ) -> AppResult<AuxSession> {
        let mut sessions = self.sessions.lock().unwrap();
        if let Some(open) = sessions
            .iter_mut()
            .find(|s| s.user_id == user_id && s.is_open())
        {
            Self::close(open, now, notes);
            return Ok(open.clone());
        }
        Self::insert_open(
            &mut sessions,
            &CreateAuxSession {
                user_id,
                status: fallback_status,
                notes: notes.map(str::to_string),
                started_at: now,
            },
        )
    }

    async fn update_notes(&self, id: AuxSessionId, notes: &str) -> AppResult<AuxSession> {
        let mut sessions = self.sessions.lock().unwrap();
        match sessions.iter_mut().find(|s| s.id == id) {
            Some(session) if session.is_open() => {
                session.notes = Some(notes.to_string());
                Ok(session.clone())
            }
            Some(_) => Err(AppError::already_ended(format!(
                "Session {id} has already been ended"
            ))),
            None => Err(AppError::not_found(format!("Session {id} not found"))),
        }
    }

    async fn list_by_user_and_window(
        &self,
        user_id: UserId,
        window: &TimeWindow,
    ) -> AppResult<Vec<AuxSession>> {
        let mut matching: Vec<AuxSession> = self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id == user_id && window.contains(s.started_at))
            .cloned()
            .collect();
        matching.sort_by_key(|s| s.started_at);
        Ok(matching)
    }

    async fn list_by_window(&self, window: &TimeWindow) -> AppResult<Vec<AuxSession>> {
        let mut matching: Vec<AuxSession> = self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| window.contains(s.started_at))
            .cloned()
            .collect();
        matching.sort_by_key(|s| s.started_at);
        Ok(matching)
    }

    async fn list_recent(&self, page: &PageRequest) -> AppResult<PageResponse<AuxSession>> {
        let mut all: Vec<AuxSession> = self.sessions.lock().unwrap().clone();
        all.sort_by_key(|s| std::cmp::Reverse(s.started_at));
        let total = all.len() as u64;
        let items: Vec<AuxSession> = all
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }
}
