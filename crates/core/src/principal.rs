//! The acting principal behind a request.

use serde::Serialize;

use crate::types::DbId;

/// An authenticated user as seen by the authorization policy.
///
/// Anonymous callers never reach the policy: the API rejects requests
/// without a valid identity before building a `Principal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub id: DbId,
    pub admin: bool,
}

impl Principal {
    pub fn new(id: DbId, admin: bool) -> Self {
        Self { id, admin }
    }

    /// Whether this principal created the record owned by `owner_id`.
    pub fn owns(&self, owner_id: DbId) -> bool {
        self.id == owner_id
    }
}
