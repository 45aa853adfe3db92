//! Application state shared across all handlers.

use std::sync::Arc;

use sqlx::PgPool;

use shiftdesk_core::config::AppConfig;
use shiftdesk_database::repositories::AuxSessionRepository;
use shiftdesk_service::report::ProductivityService;
use shiftdesk_service::tracker::AuxTrackerService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool.
    pub db_pool: PgPool,
    /// AUX session repository.
    pub session_repo: Arc<AuxSessionRepository>,
    /// Session lifecycle tracker.
    pub tracker: Arc<AuxTrackerService>,
    /// Productivity report service.
    pub productivity: Arc<ProductivityService>,
}
