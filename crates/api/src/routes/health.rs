//! Liveness for load balancers and operators, mounted outside `/api/v1`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database cannot be reached.
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
    /// Where approval notices go: `smtp`, or `log` when no mail server is set.
    pub notifier: &'static str,
    pub cached_projects: usize,
}

/// GET /health
///
/// Answers 503 while the database is down so the instance is taken out of
/// rotation; the body is the same either way.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database_up = match shootbook_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(error = %e, "Health check could not reach the database");
            false
        }
    };

    let body = HealthResponse {
        status: if database_up { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database: if database_up { "up" } else { "down" },
        notifier: state.notifier.channel(),
        cached_projects: state.cache.len().await,
    };
    let code = if database_up {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(body))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
