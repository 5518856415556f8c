use std::sync::Arc;

use shootbook_events::Notifier;

use crate::cache::ProjectCache;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: shootbook_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Outbound approval notices (email, or the log when SMTP is not configured).
    pub notifier: Arc<dyn Notifier>,
    /// Read-through cache for single-project reads.
    pub cache: Arc<ProjectCache>,
}
