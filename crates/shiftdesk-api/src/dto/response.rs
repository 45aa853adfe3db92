//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shiftdesk_entity::aux_session::model::AuxSession;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// AUX session representation with the live elapsed value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuxSessionResponse {
    /// Session ID.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Declared work status.
    pub status: String,
    /// Annotation.
    pub notes: Option<String>,
    /// Start timestamp.
    pub started_at: DateTime<Utc>,
    /// End timestamp, absent while open.
    pub ended_at: Option<DateTime<Utc>>,
    /// Elapsed seconds at response time (frozen once ended).
    pub elapsed_seconds: i64,
}

impl AuxSessionResponse {
    /// Builds the response view of a session, measuring elapsed time at
    /// `now` for open sessions.
    pub fn from_session(session: &AuxSession, now: DateTime<Utc>) -> Self {
        Self {
            id: session.id.into_uuid(),
            user_id: session.user_id.into_uuid(),
            status: session.status.to_string(),
            notes: session.notes.clone(),
            started_at: session.started_at,
            ended_at: session.ended_at,
            elapsed_seconds: session.elapsed_at(now).num_seconds(),
        }
    }
}

/// Wrapper for the current-session lookup, `session: null` when the
/// user has no open session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentSessionResponse {
    /// The open session, if any.
    pub session: Option<AuxSessionResponse>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
}

/// Detailed health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    /// Overall status.
    pub status: String,
    /// Database status.
    pub database: String,
}
