//! AUX session lifecycle handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;
use validator::Validate;

use shiftdesk_core::error::AppError;
use shiftdesk_entity::aux_session::status::AuxStatus;

use crate::dto::request::{
    EndSessionRequest, StartSessionRequest, SwitchStatusRequest, ToggleShiftRequest,
    UpdateNotesRequest, WindowQuery,
};
use crate::dto::response::{ApiResponse, AuxSessionResponse, CurrentSessionResponse};
use crate::error::ApiError;
use crate::handlers::parse_window;
use crate::state::AppState;

/// POST /api/aux/sessions
pub async fn start_session(
    State(state): State<AppState>,
    Json(req): Json<StartSessionRequest>,
) -> Result<Json<ApiResponse<AuxSessionResponse>>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let status: AuxStatus = req.status.parse()?;

    let session = state
        .tracker
        .start_session(req.user_id.into(), status, req.notes)
        .await?;

    Ok(Json(ApiResponse::ok(AuxSessionResponse::from_session(
        &session,
        state.tracker.now(),
    ))))
}

/// POST /api/aux/sessions/{id}/end
pub async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<EndSessionRequest>,
) -> Result<Json<ApiResponse<AuxSessionResponse>>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let session = state.tracker.end_session(id.into(), req.notes).await?;

    Ok(Json(ApiResponse::ok(AuxSessionResponse::from_session(
        &session,
        state.tracker.now(),
    ))))
}

/// POST /api/aux/switch
pub async fn switch_status(
    State(state): State<AppState>,
    Json(req): Json<SwitchStatusRequest>,
) -> Result<Json<ApiResponse<AuxSessionResponse>>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let status: AuxStatus = req.status.parse()?;

    let session = state
        .tracker
        .switch_status(req.user_id.into(), status, req.notes)
        .await?;

    Ok(Json(ApiResponse::ok(AuxSessionResponse::from_session(
        &session,
        state.tracker.now(),
    ))))
}

/// POST /api/aux/toggle
pub async fn toggle_shift(
    State(state): State<AppState>,
    Json(req): Json<ToggleShiftRequest>,
) -> Result<Json<ApiResponse<AuxSessionResponse>>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let session = state
        .tracker
        .toggle_shift(req.user_id.into(), req.notes)
        .await?;

    Ok(Json(ApiResponse::ok(AuxSessionResponse::from_session(
        &session,
        state.tracker.now(),
    ))))
}

/// PUT /api/aux/sessions/{id}/notes
pub async fn update_notes(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateNotesRequest>,
) -> Result<Json<ApiResponse<AuxSessionResponse>>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let session = state.tracker.update_notes(id.into(), req.notes).await?;

    Ok(Json(ApiResponse::ok(AuxSessionResponse::from_session(
        &session,
        state.tracker.now(),
    ))))
}

/// GET /api/aux/users/{user_id}/current
pub async fn get_current(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<CurrentSessionResponse>>, ApiError> {
    let session = state.tracker.current_session(user_id.into()).await?;
    let now = state.tracker.now();

    Ok(Json(ApiResponse::ok(CurrentSessionResponse {
        session: session.map(|s| AuxSessionResponse::from_session(&s, now)),
    })))
}

/// GET /api/aux/users/{user_id}/sessions
pub async fn session_history(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<ApiResponse<Vec<AuxSessionResponse>>>, ApiError> {
    let now = state.tracker.now();
    let window = parse_window(&query, now)?;

    let sessions = state
        .tracker
        .session_history(user_id.into(), &window)
        .await?;

    Ok(Json(ApiResponse::ok(
        sessions
            .iter()
            .map(|s| AuxSessionResponse::from_session(s, now))
            .collect(),
    )))
}
