//! User entity model and DTOs.
//!
//! Users are provisioned by the identity provider. The booking service only
//! reads them, apart from [`CreateUser`] which seeding and tests use.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use shootbook_core::principal::Principal;
use shootbook_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub name: Option<String>,
    pub email: Option<String>,
    pub admin: bool,
    pub image: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    pub fn principal(&self) -> Principal {
        Principal::new(self.id, self.admin)
    }

    /// Name to show in notices, falling back to `"unknown"`.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unknown")
    }
}

/// DTO for creating a new user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub admin: bool,
    pub image: Option<String>,
}
