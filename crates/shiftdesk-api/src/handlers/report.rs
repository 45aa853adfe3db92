//! Productivity report and admin dashboard handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use shiftdesk_service::report::ProductivityReport;

use crate::dto::request::WindowQuery;
use crate::dto::response::{ApiResponse, AuxSessionResponse};
use crate::error::ApiError;
use crate::extractors::PaginationParams;
use crate::handlers::parse_window;
use crate::state::AppState;

/// GET /api/aux/users/{user_id}/report
pub async fn user_report(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<ApiResponse<ProductivityReport>>, ApiError> {
    let window = parse_window(&query, state.tracker.now())?;
    let report = state
        .productivity
        .report_for_user(user_id.into(), &window)
        .await?;

    Ok(Json(ApiResponse::ok(report)))
}

/// GET /api/admin/aux/report
pub async fn admin_report(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<ApiResponse<ProductivityReport>>, ApiError> {
    let window = parse_window(&query, state.tracker.now())?;
    let report = state.productivity.report_all(&window).await?;

    Ok(Json(ApiResponse::ok(report)))
}

/// GET /api/admin/aux/sessions
pub async fn admin_sessions(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let page = state
        .tracker
        .list_recent(&params.into_page_request())
        .await?;

    let now = state.tracker.now();
    let items: Vec<AuxSessionResponse> = page
        .items
        .iter()
        .map(|s| AuxSessionResponse::from_session(s, now))
        .collect();

    Ok(Json(serde_json::json!({
        "success": true,
        "data": {
            "items": items,
            "page": page.page,
            "page_size": page.page_size,
            "total_items": page.total_items,
            "total_pages": page.total_pages,
        }
    })))
}
