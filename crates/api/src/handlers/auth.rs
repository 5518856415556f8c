//! Handlers for the `/auth` resource.

use axum::Json;
use shootbook_db::models::user::User;

use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;

/// GET /api/v1/auth/me
///
/// The calling user as the service sees them, including the admin flag.
pub async fn me(auth: AuthUser) -> Json<DataResponse<User>> {
    Json(DataResponse { data: auth.user })
}
