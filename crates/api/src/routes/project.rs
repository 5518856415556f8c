//! Route definitions for the `/projects` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::project;
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                                  -> list
/// POST   /                                  -> create
/// GET    /calendar                          -> calendar
/// GET    /form                              -> form
/// GET    /{id}                              -> get_by_id
/// PUT    /{id}                              -> update
/// DELETE /{id}                              -> delete
/// POST   /{id}/approval-request             -> request_approval
/// PUT    /{id}/approval                     -> set_approval
/// PUT    /{id}/completion                   -> set_completion
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route("/calendar", get(project::calendar))
        .route("/form", get(project::form))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route("/{id}/approval-request", post(project::request_approval))
        .route("/{id}/approval", put(project::set_approval))
        .route("/{id}/completion", put(project::set_completion))
}
