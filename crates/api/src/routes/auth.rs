//! Route definitions for the `/auth` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// GET    /me                                -> me
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/me", get(auth::me))
}
