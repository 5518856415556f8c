//! Authorization policy for project operations.
//!
//! [`authorize`] is a pure decision over the acting [`Principal`], the
//! operation, and the *stored* state of the target project. Callers must
//! load the target fresh from the store immediately before mutating it;
//! client-supplied lifecycle flags never feed this function.

use crate::error::CoreError;
use crate::principal::Principal;
use crate::types::DbId;

/// Operation kinds subject to authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    ReadOne,
    ReadList,
    /// Field edits (anything other than the lifecycle flags).
    Update,
    Delete,
    RequestApproval,
    SetApproval,
    SetComplete,
}

impl Operation {
    /// Short verb used in denial messages and log fields.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::ReadOne => "view",
            Self::ReadList => "list",
            Self::Update => "edit",
            Self::Delete => "delete",
            Self::RequestApproval => "request approval for",
            Self::SetApproval => "change approval of",
            Self::SetComplete => "change completion of",
        }
    }

    /// Whether the operation addresses a single existing project.
    pub fn needs_target(&self) -> bool {
        !matches!(self, Self::Create | Self::ReadList)
    }
}

/// The stored facts about a project that authorization depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectAccess {
    pub owner_id: DbId,
    pub approved: bool,
}

/// Decide whether `principal` may perform `op` on `target`.
///
/// Returns `CoreError::Unauthorized` on denial. A per-project operation
/// called without a target is a programming error and yields
/// `CoreError::Internal`.
pub fn authorize(
    principal: &Principal,
    op: Operation,
    target: Option<&ProjectAccess>,
) -> Result<(), CoreError> {
    let target = match (op.needs_target(), target) {
        (false, _) => return Ok(()),
        (true, Some(t)) => t,
        (true, None) => {
            return Err(CoreError::Internal(format!(
                "authorization for '{}' requires a target project",
                op.verb()
            )))
        }
    };

    let allowed = match op {
        Operation::Create | Operation::ReadList => true,
        Operation::ReadOne => principal.admin || principal.owns(target.owner_id),
        Operation::Update => {
            principal.admin || (principal.owns(target.owner_id) && !target.approved)
        }
        Operation::RequestApproval => principal.owns(target.owner_id),
        Operation::Delete | Operation::SetApproval | Operation::SetComplete => principal.admin,
    };

    if allowed {
        Ok(())
    } else {
        Err(deny(principal, op, target))
    }
}

fn deny(principal: &Principal, op: Operation, target: &ProjectAccess) -> CoreError {
    let reason = match op {
        Operation::Delete | Operation::SetApproval | Operation::SetComplete => {
            format!("Only admins can {} projects", op.verb())
        }
        Operation::Update if principal.owns(target.owner_id) => {
            "Approved projects can only be edited by an admin".to_string()
        }
        Operation::RequestApproval => {
            "Only the project owner can request approval".to_string()
        }
        _ => format!("Cannot {} another user's project", op.verb()),
    };
    CoreError::Unauthorized(reason)
}
