//! Shared query parameter types for API handlers.

use serde::Deserialize;
use shootbook_db::models::project::{ProjectFilter, ProjectSort, SortField, SortOrder};

/// Query parameters for `GET /projects` and `GET /projects/calendar`
/// (`?approved=&complete=&sort=&order=`).
///
/// Kept flat: URL-encoded booleans do not survive `#[serde(flatten)]`.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectListParams {
    pub approved: Option<bool>,
    pub complete: Option<bool>,
    #[serde(default)]
    pub sort: SortField,
    #[serde(default)]
    pub order: SortOrder,
}

impl ProjectListParams {
    pub fn filter(&self) -> ProjectFilter {
        ProjectFilter {
            approved: self.approved,
            complete: self.complete,
        }
    }

    pub fn sort(&self) -> ProjectSort {
        ProjectSort {
            sort: self.sort,
            order: self.order,
        }
    }
}
