//! Handlers for the `/projects` resource.
//!
//! Every mutation follows the same path: load the stored row, authorize and
//! plan against it, send whatever notice the plan asks for, write with the
//! loaded version as a guard, then invalidate the cache.
//!
//! The owner's approval notice goes out before the write. If it cannot be
//! sent the call fails and nothing is stored, so retrying approves and
//! notifies again.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use shootbook_core::calendar::{build_events, CalendarEvent};
use shootbook_core::error::CoreError;
use shootbook_core::form::{project_form, FormField};
use shootbook_core::lifecycle::{self, FlagRequest, UpdatePlan};
use shootbook_core::policy::{authorize, Operation};
use shootbook_core::readiness::ensure_ready_for_approval;
use shootbook_core::types::DbId;
use shootbook_db::models::project::{OwnerSummary, Project, ProjectInput, ProjectWithOwner};
use shootbook_db::models::user::User;
use shootbook_db::repositories::{ProjectRepo, UserRepo};
use shootbook_events::{ApprovalGrantedNotice, ApprovalRequestNotice, NotifyError};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{QueryParams, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::query::ProjectListParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `PUT /projects/{id}`: the full field set plus optional
/// lifecycle changes.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub fields: ProjectInput,
    pub approved: Option<bool>,
    pub complete: Option<bool>,
    /// Email the owner if this update approves the project.
    #[serde(default)]
    pub notify_approved: bool,
    /// The version the client last read. A mismatch fails with 409.
    pub version: Option<i32>,
}

/// Request body for `PUT /projects/{id}/approval`.
#[derive(Debug, Deserialize, Validate)]
pub struct SetApprovalRequest {
    pub approved: bool,
    #[serde(default)]
    pub notify: bool,
    pub version: Option<i32>,
}

/// Request body for `PUT /projects/{id}/completion`.
#[derive(Debug, Deserialize, Validate)]
pub struct SetCompletionRequest {
    pub complete: bool,
    pub version: Option<i32>,
}

/// A project after an update, and whether its owner was sent an approval
/// notice by this call. `false` when none was asked for or the owner has no
/// email address.
#[derive(Debug, Serialize)]
pub struct ProjectUpdated {
    #[serde(flatten)]
    pub project: ProjectWithOwner,
    pub notified: bool,
}

/// Response for `POST /projects/{id}/approval-request`.
#[derive(Debug, Serialize)]
pub struct ApprovalRequestSent {
    pub project_id: DbId,
    /// Number of admins the request was sent to.
    pub notified: usize,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Project",
        id,
    })
}

fn stale(id: DbId) -> AppError {
    AppError::Core(CoreError::Conflict(format!(
        "Project {id} was changed by someone else. Reload it and try again"
    )))
}

/// Load the stored row a mutation is judged against.
async fn load_project(pool: &sqlx::PgPool, id: DbId) -> AppResult<Project> {
    ProjectRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

async fn load_owner(pool: &sqlx::PgPool, project: &Project) -> AppResult<User> {
    UserRepo::find_by_id(pool, project.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Internal(format!(
                "project {} references missing user {}",
                project.id, project.user_id
            )))
        })
}

fn check_version(project: &Project, requested: Option<i32>) -> AppResult<()> {
    match requested {
        Some(version) if version != project.version => Err(stale(project.id)),
        _ => Ok(()),
    }
}

/// Resolve a guarded write: `None` means the row vanished or moved on.
async fn written_or_stale(
    pool: &sqlx::PgPool,
    id: DbId,
    written: Option<Project>,
) -> AppResult<Project> {
    match written {
        Some(project) => Ok(project),
        None => match ProjectRepo::find_by_id(pool, id).await? {
            Some(_) => Err(stale(id)),
            None => Err(not_found(id)),
        },
    }
}

fn with_owner(project: Project, owner: &User) -> ProjectWithOwner {
    ProjectWithOwner {
        project,
        user: OwnerSummary::from(owner),
    }
}

/// Returns whether a notice was handed to the notifier.
async fn notify_owner_approved(
    state: &AppState,
    project_id: DbId,
    project_name: &str,
    owner: &User,
) -> Result<bool, NotifyError> {
    let recipient = owner.email.clone().unwrap_or_default();
    if recipient.trim().is_empty() {
        tracing::warn!(
            project_id,
            owner_id = owner.id,
            "Owner has no email address; approval notice not sent"
        );
        return Ok(false);
    }

    let notice = ApprovalGrantedNotice {
        owner_name: owner.display_name().to_string(),
        project_name: project_name.to_string(),
        project_id,
        recipient,
        link: state.config.project_link(project_id),
    };
    state.notifier.send_approval_granted(&notice).await?;
    tracing::info!(project_id, to = %notice.recipient, "Owner notified of approval");
    Ok(true)
}

/// Post-write steps shared by every update path.
async fn finish_update(
    state: &AppState,
    auth: &AuthUser,
    updated: Project,
    plan: &UpdatePlan,
    owner: &User,
    notified: bool,
) -> ProjectUpdated {
    state.cache.invalidate(updated.id, updated.version).await;

    for transition in &plan.transitions {
        tracing::info!(
            project_id = updated.id,
            user_id = auth.user.id,
            transition = transition.as_str(),
            state = updated.flags().state().as_str(),
            "Project lifecycle transition"
        );
    }

    ProjectUpdated {
        project: with_owner(updated, owner),
        notified,
    }
}

/// Apply a flag-only change. `op` is checked up front so that a no-op
/// request from someone without permission is still refused.
async fn change_flags(
    state: &AppState,
    auth: &AuthUser,
    project: Project,
    op: Operation,
    request: FlagRequest,
    version: Option<i32>,
) -> AppResult<ProjectUpdated> {
    let principal = auth.principal();
    authorize(&principal, op, Some(&project.access()))?;
    let plan = lifecycle::plan_update(&principal, project.user_id, project.flags(), &request, false)?;
    check_version(&project, version)?;

    let owner = load_owner(&state.pool, &project).await?;
    if plan.transitions.is_empty() {
        return Ok(ProjectUpdated {
            project: with_owner(project, &owner),
            notified: false,
        });
    }

    let notified = if plan.notify_owner {
        notify_owner_approved(state, project.id, &project.name, &owner).await?
    } else {
        false
    };

    let written =
        ProjectRepo::set_flags(&state.pool, project.id, plan.flags, Some(project.version)).await?;
    let updated = written_or_stale(&state.pool, project.id, written).await?;
    Ok(finish_update(state, auth, updated, &plan, &owner, notified).await)
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/projects
///
/// The caller becomes the owner. New projects always start in the pipeline.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<ProjectInput>,
) -> AppResult<(StatusCode, Json<DataResponse<ProjectWithOwner>>)> {
    authorize(&auth.principal(), Operation::Create, None)?;

    let project = ProjectRepo::create(&state.pool, auth.user.id, &input).await?;
    tracing::info!(project_id = project.id, user_id = auth.user.id, "Project created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: with_owner(project, &auth.user),
        }),
    ))
}

/// GET /api/v1/projects?approved=&complete=&sort=&order=
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    QueryParams(params): QueryParams<ProjectListParams>,
) -> AppResult<Json<DataResponse<Vec<ProjectWithOwner>>>> {
    authorize(&auth.principal(), Operation::ReadList, None)?;

    let projects = ProjectRepo::list(&state.pool, &params.filter(), &params.sort()).await?;
    state.cache.prime_many(&projects).await;

    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProjectWithOwner>>> {
    let project = match state.cache.get(id).await {
        Some(hit) => hit,
        None => {
            let loaded = ProjectRepo::find_with_owner(&state.pool, id)
                .await?
                .ok_or_else(|| not_found(id))?;
            state.cache.insert(loaded.clone()).await;
            loaded
        }
    };

    authorize(
        &auth.principal(),
        Operation::ReadOne,
        Some(&project.project.access()),
    )?;

    Ok(Json(DataResponse { data: project }))
}

/// PUT /api/v1/projects/{id}
///
/// Replaces the descriptive fields and optionally changes the lifecycle
/// flags in the same write.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    ValidatedJson(req): ValidatedJson<UpdateProjectRequest>,
) -> AppResult<Json<DataResponse<ProjectUpdated>>> {
    let project = load_project(&state.pool, id).await?;

    let request = FlagRequest {
        approved: req.approved,
        complete: req.complete,
        notify_approved: req.notify_approved,
    };
    let plan =
        lifecycle::plan_update(&auth.principal(), project.user_id, project.flags(), &request, true)?;
    check_version(&project, req.version)?;

    let owner = load_owner(&state.pool, &project).await?;
    let notified = if plan.notify_owner {
        notify_owner_approved(&state, id, &req.fields.name, &owner).await?
    } else {
        false
    };

    let written = ProjectRepo::update(
        &state.pool,
        id,
        &req.fields,
        plan.flags,
        Some(project.version),
    )
    .await?;
    let updated = written_or_stale(&state.pool, id, written).await?;
    tracing::info!(
        project_id = id,
        user_id = auth.user.id,
        version = updated.version,
        "Project updated"
    );

    let data = finish_update(&state, &auth, updated, &plan, &owner, notified).await;
    Ok(Json(DataResponse { data }))
}

/// DELETE /api/v1/projects/{id}
///
/// Admin only, in any state. The row is removed permanently.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let project = load_project(&state.pool, id).await?;
    authorize(&auth.principal(), Operation::Delete, Some(&project.access()))?;

    let deleted = ProjectRepo::delete(&state.pool, id).await?;
    state.cache.remove(id).await;
    if !deleted {
        return Err(not_found(id));
    }

    tracing::info!(project_id = id, user_id = auth.user.id, "Project deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// POST /api/v1/projects/{id}/approval-request
///
/// Emails every admin asking them to review the project. The project row is
/// not changed. Returns 202 with the number of admins notified.
pub async fn request_approval(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<ApprovalRequestSent>>)> {
    let project = load_project(&state.pool, id).await?;
    lifecycle::request_approval(&auth.principal(), project.user_id, project.flags())?;
    ensure_ready_for_approval(&project.approval_checklist())?;

    let recipients: Vec<String> = UserRepo::list_admins(&state.pool)
        .await?
        .into_iter()
        .filter_map(|admin| admin.email)
        .filter(|email| !email.trim().is_empty())
        .collect();
    let notified = recipients.len();

    if recipients.is_empty() {
        tracing::warn!(project_id = id, "No admin has an email address; approval request not sent");
    } else {
        let notice = ApprovalRequestNotice {
            requester_name: auth.user.display_name().to_string(),
            project_name: project.name.clone(),
            project_id: id,
            recipients,
            link: state.config.project_link(id),
        };
        state.notifier.send_approval_request(&notice).await?;
    }

    tracing::info!(project_id = id, user_id = auth.user.id, notified, "Approval requested");
    Ok((
        StatusCode::ACCEPTED,
        Json(DataResponse {
            data: ApprovalRequestSent {
                project_id: id,
                notified,
            },
        }),
    ))
}

/// PUT /api/v1/projects/{id}/approval
///
/// Admin only. `{ "approved": true, "notify": true }` approves and emails
/// the owner; `{ "approved": false }` revokes.
pub async fn set_approval(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    ValidatedJson(req): ValidatedJson<SetApprovalRequest>,
) -> AppResult<Json<DataResponse<ProjectUpdated>>> {
    let project = load_project(&state.pool, id).await?;
    let request = FlagRequest {
        approved: Some(req.approved),
        complete: None,
        notify_approved: req.notify,
    };
    let data = change_flags(
        &state,
        &auth,
        project,
        Operation::SetApproval,
        request,
        req.version,
    )
    .await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/projects/{id}/completion
///
/// Admin only. Only approved projects can be completed.
pub async fn set_completion(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    ValidatedJson(req): ValidatedJson<SetCompletionRequest>,
) -> AppResult<Json<DataResponse<ProjectUpdated>>> {
    let project = load_project(&state.pool, id).await?;
    let request = FlagRequest {
        approved: None,
        complete: Some(req.complete),
        notify_approved: false,
    };
    let data = change_flags(
        &state,
        &auth,
        project,
        Operation::SetComplete,
        request,
        req.version,
    )
    .await?;
    Ok(Json(DataResponse { data }))
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// GET /api/v1/projects/calendar?approved=&complete=
///
/// Shoot windows and deadlines for the projects the list would return.
pub async fn calendar(
    State(state): State<AppState>,
    auth: AuthUser,
    QueryParams(params): QueryParams<ProjectListParams>,
) -> AppResult<Json<DataResponse<Vec<CalendarEvent>>>> {
    authorize(&auth.principal(), Operation::ReadList, None)?;

    let projects = ProjectRepo::list(&state.pool, &params.filter(), &params.sort()).await?;
    let events = build_events(projects.iter().map(|p| p.project.calendar_entry()));

    Ok(Json(DataResponse { data: events }))
}

/// GET /api/v1/projects/form
pub async fn form(_auth: AuthUser) -> Json<DataResponse<Vec<FormField>>> {
    Json(DataResponse {
        data: project_form(),
    })
}
