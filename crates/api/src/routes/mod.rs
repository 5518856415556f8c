pub mod auth;
pub mod health;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/me                                  current user (requires auth)
///
/// /projects                                 list, create
/// /projects/calendar                        calendar events
/// /projects/form                            form description
/// /projects/{id}                            get, update, delete
/// /projects/{id}/approval-request           ask admins to approve (POST)
/// /projects/{id}/approval                   approve / revoke (PUT, admin)
/// /projects/{id}/completion                 complete / reopen (PUT, admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/projects", project::router())
}
