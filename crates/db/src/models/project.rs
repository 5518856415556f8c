//! Project entity model and DTOs.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use shootbook_core::budget::{deserialize_optional_band, validate_band};
use shootbook_core::calendar::CalendarEntry;
use shootbook_core::lifecycle::LifecycleFlags;
use shootbook_core::policy::ProjectAccess;
use shootbook_core::readiness::ApprovalChecklist;
use shootbook_core::resources::validate_resource_counts;
use shootbook_core::shoot::{ShootBase, ShootType};
use shootbook_core::types::{DbId, Timestamp};
use validator::{Validate, ValidationError};

use crate::models::user::User;

/// A reference to an uploaded script file. The upload service owns the file;
/// only the name and URL are kept here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ScriptFile {
    pub name: String,
    #[validate(url(message = "script file url must be a valid URL"))]
    pub url: String,
}

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub user_id: DbId,
    pub version: i32,
    pub name: String,
    pub client: String,
    pub job_number: Option<String>,
    pub head: String,
    #[sqlx(try_from = "String")]
    pub shoot_type: ShootType,
    #[sqlx(try_from = "String")]
    pub shoot_base: ShootBase,
    pub locations: String,
    pub location_count: i32,
    pub finalised_concept: bool,
    pub concept: Option<String>,
    pub finalised_script: bool,
    pub script_files: Json<Vec<ScriptFile>>,
    /// Index into `shootbook_core::budget::BUDGET_BANDS`.
    pub budget: Option<i16>,
    pub resources: Vec<String>,
    pub actors_count: Option<i32>,
    pub extras_count: Option<i32>,
    pub notes: String,
    pub due_date: Option<Timestamp>,
    pub shoot_start: Option<Timestamp>,
    pub shoot_end: Option<Timestamp>,
    pub approved: bool,
    pub complete: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    pub fn flags(&self) -> LifecycleFlags {
        LifecycleFlags::new(self.approved, self.complete)
    }

    pub fn access(&self) -> ProjectAccess {
        ProjectAccess {
            owner_id: self.user_id,
            approved: self.approved,
        }
    }

    pub fn approval_checklist(&self) -> ApprovalChecklist<'_> {
        ApprovalChecklist {
            job_number: self.job_number.as_deref(),
            due_date: self.due_date,
            shoot_start: self.shoot_start,
            shoot_end: self.shoot_end,
            finalised_concept: self.finalised_concept,
            budget: self.budget,
        }
    }

    pub fn calendar_entry(&self) -> CalendarEntry<'_> {
        CalendarEntry {
            project_id: self.id,
            name: &self.name,
            client: &self.client,
            approved: self.approved,
            shoot_start: self.shoot_start,
            shoot_end: self.shoot_end,
            due_date: self.due_date,
        }
    }
}

/// The owning user as embedded in project responses.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OwnerSummary {
    #[sqlx(rename = "owner_id")]
    pub id: DbId,
    #[sqlx(rename = "owner_name")]
    pub name: Option<String>,
    #[sqlx(rename = "owner_email")]
    pub email: Option<String>,
    #[sqlx(rename = "owner_image")]
    pub image: Option<String>,
}

impl From<&User> for OwnerSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            image: user.image.clone(),
        }
    }
}

/// A project joined with its owner.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectWithOwner {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub project: Project,
    #[sqlx(flatten)]
    pub user: OwnerSummary,
}

/// Descriptive fields submitted when creating or editing a project.
///
/// Lifecycle flags and the owner are deliberately absent: the owner comes
/// from the authenticated principal and new projects always start in the
/// pipeline. Unknown keys (such as a stray `approved`) are ignored.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_project_input", skip_on_field_errors = false))]
pub struct ProjectInput {
    #[validate(length(min = 3, message = "name must be at least 3 characters"))]
    pub name: String,
    #[validate(length(min = 2, message = "client must be at least 2 characters"))]
    pub client: String,
    pub job_number: Option<String>,
    #[serde(default)]
    pub head: String,
    pub shoot_type: ShootType,
    pub shoot_base: ShootBase,
    #[serde(default)]
    pub locations: String,
    #[serde(default)]
    #[validate(range(min = 0, message = "location_count must not be negative"))]
    pub location_count: i32,
    #[serde(default)]
    pub finalised_concept: bool,
    pub concept: Option<String>,
    #[serde(default)]
    pub finalised_script: bool,
    #[serde(default)]
    #[validate(nested)]
    pub script_files: Vec<ScriptFile>,
    #[serde(default, deserialize_with = "deserialize_optional_band")]
    pub budget: Option<i16>,
    #[serde(default)]
    pub resources: Vec<String>,
    #[validate(range(min = 0, message = "actors_count must not be negative"))]
    pub actors_count: Option<i32>,
    #[validate(range(min = 0, message = "extras_count must not be negative"))]
    pub extras_count: Option<i32>,
    #[serde(default)]
    pub notes: String,
    pub due_date: Option<Timestamp>,
    pub shoot_start: Option<Timestamp>,
    pub shoot_end: Option<Timestamp>,
}

/// Cross-field checks that the per-field attributes cannot express.
fn validate_project_input(input: &ProjectInput) -> Result<(), ValidationError> {
    if let Some(band) = input.budget {
        validate_band(band)
            .map_err(|msg| ValidationError::new("budget").with_message(Cow::Owned(msg)))?;
    }
    validate_resource_counts(&input.resources, input.actors_count, input.extras_count)
        .map_err(|msg| ValidationError::new("resources").with_message(Cow::Owned(msg)))?;
    Ok(())
}

/// Filter for listing projects.
///
/// `complete` defaults to `false`, so plain listings hide finished work.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ProjectFilter {
    pub approved: Option<bool>,
    pub complete: Option<bool>,
}

impl ProjectFilter {
    pub fn complete_or_default(&self) -> bool {
        self.complete.unwrap_or(false)
    }
}

/// Sortable project columns for the table view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    CreatedAt,
    Name,
    Client,
    DueDate,
    ShootStart,
    Budget,
}

impl SortField {
    fn column(&self) -> &'static str {
        match self {
            Self::CreatedAt => "p.created_at",
            Self::Name => "p.name",
            Self::Client => "p.client",
            Self::DueDate => "p.due_date",
            Self::ShootStart => "p.shoot_start",
            Self::Budget => "p.budget",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Sort order for the table view. Defaults to newest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ProjectSort {
    #[serde(default)]
    pub sort: SortField,
    #[serde(default)]
    pub order: SortOrder,
}

impl ProjectSort {
    /// Build an `ORDER BY` clause from the fixed column whitelist. Ties are
    /// broken by id so paging through equal values is stable.
    pub fn order_clause(&self) -> String {
        let dir = match self.order {
            SortOrder::Asc => "ASC NULLS LAST",
            SortOrder::Desc => "DESC NULLS LAST",
        };
        format!("{} {dir}, p.id DESC", self.sort.column())
    }
}
