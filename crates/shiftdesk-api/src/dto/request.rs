//! Request DTOs.
//!
//! `status` fields arrive as strings and are parsed at the handler
//! boundary so that unknown values surface as validation errors rather
//! than deserialization failures.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// POST /api/aux/sessions
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StartSessionRequest {
    /// Owning user.
    pub user_id: Uuid,
    /// Declared work status.
    pub status: String,
    /// Optional annotation.
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// POST /api/aux/sessions/{id}/end
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EndSessionRequest {
    /// Optional annotation; overwrites existing notes when present.
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// POST /api/aux/switch
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SwitchStatusRequest {
    /// Owning user.
    pub user_id: Uuid,
    /// The status to switch to.
    pub status: String,
    /// Optional annotation for the new session.
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// POST /api/aux/toggle
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ToggleShiftRequest {
    /// Owning user.
    pub user_id: Uuid,
    /// Optional annotation.
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// PUT /api/aux/sessions/{id}/notes
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateNotesRequest {
    /// Replacement notes text.
    #[validate(length(max = 2000))]
    pub notes: String,
}

/// Time window query parameters shared by history and report endpoints.
///
/// RFC 3339 timestamps; both bounds optional, defaulting to the trailing
/// seven days.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowQuery {
    /// Inclusive window start.
    pub from: Option<String>,
    /// Exclusive window end.
    pub to: Option<String>,
}
