//! Route definitions for the ShiftDesk HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor.

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
///
/// Receives the fully-constructed `AppState` and threads it through
/// every route via `.with_state(state)`.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(aux_routes())
        .merge(admin_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// AUX session lifecycle, history, and per-user reports
fn aux_routes() -> Router<AppState> {
    Router::new()
        .route("/aux/sessions", post(handlers::aux_session::start_session))
        .route(
            "/aux/sessions/{id}/end",
            post(handlers::aux_session::end_session),
        )
        .route(
            "/aux/sessions/{id}/notes",
            put(handlers::aux_session::update_notes),
        )
        .route("/aux/switch", post(handlers::aux_session::switch_status))
        .route("/aux/toggle", post(handlers::aux_session::toggle_shift))
        .route(
            "/aux/users/{user_id}/current",
            get(handlers::aux_session::get_current),
        )
        .route(
            "/aux/users/{user_id}/sessions",
            get(handlers::aux_session::session_history),
        )
        .route(
            "/aux/users/{user_id}/report",
            get(handlers::report::user_report),
        )
}

/// Admin dashboard endpoints
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/aux/report", get(handlers::report::admin_report))
        .route("/admin/aux/sessions", get(handlers::report::admin_sessions))
}

/// Health check endpoints (no auth required)
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}

/// Build CORS layer from configuration
fn build_cors_layer(state: &AppState) -> CorsLayer {
    use axum::http::{HeaderValue, Method};
    use tower_http::cors::Any;

    let cors_config = &state.config.server.cors;

    let mut cors = CorsLayer::new();

    if cors_config.allowed_origins.contains(&"*".to_string()) {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = cors_config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    let methods: Vec<Method> = cors_config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    cors = cors.allow_methods(methods);

    if cors_config.allowed_headers.contains(&"*".to_string()) {
        cors = cors.allow_headers(Any);
    }

    cors.max_age(std::time::Duration::from_secs(cors_config.max_age_seconds))
}
