//! Project approval/completion lifecycle.
//!
//! The persisted state is two booleans on the project row. This module
//! names the states they encode, works out which transitions a requested
//! flag change amounts to, and checks each one against the policy:
//!
//! ```text
//!            Approve               Complete
//! Pipeline ----------> Active ----------------> Complete
//!          <----------        <----------------
//!            Revoke                Reopen
//! ```
//!
//! "Pending approval" is not a stored state. Requesting approval only sends
//! a notification to the admins; the row is not touched.

use serde::Serialize;

use crate::error::CoreError;
use crate::policy::{authorize, Operation, ProjectAccess};
use crate::principal::Principal;
use crate::types::DbId;

pub const STATE_PIPELINE: &str = "pipeline";
pub const STATE_ACTIVE: &str = "active";
pub const STATE_COMPLETE: &str = "complete";

/// A lifecycle state derived from the stored flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectState {
    Pipeline,
    Active,
    Complete,
}

impl ProjectState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pipeline => STATE_PIPELINE,
            Self::Active => STATE_ACTIVE,
            Self::Complete => STATE_COMPLETE,
        }
    }
}

/// The two persisted lifecycle flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LifecycleFlags {
    pub approved: bool,
    pub complete: bool,
}

impl LifecycleFlags {
    pub fn new(approved: bool, complete: bool) -> Self {
        Self { approved, complete }
    }

    /// Map the flags onto a state. Anything unapproved is `Pipeline`.
    pub fn state(&self) -> ProjectState {
        match (self.approved, self.complete) {
            (false, _) => ProjectState::Pipeline,
            (true, false) => ProjectState::Active,
            (true, true) => ProjectState::Complete,
        }
    }
}

/// A single lifecycle edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Approve,
    Revoke,
    Complete,
    Reopen,
}

impl Transition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Revoke => "revoke",
            Self::Complete => "complete",
            Self::Reopen => "reopen",
        }
    }
}

/// What the caller asked for alongside (or instead of) a field edit.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlagRequest {
    /// Desired `approved` value; `None` leaves it as stored.
    pub approved: Option<bool>,
    /// Desired `complete` value; `None` leaves it as stored.
    pub complete: Option<bool>,
    /// Send the owner an "approved" notice if this call approves the project.
    pub notify_approved: bool,
}

/// The outcome of [`plan_update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePlan {
    /// Flags to persist.
    pub flags: LifecycleFlags,
    /// Transitions performed, in application order.
    pub transitions: Vec<Transition>,
    /// Whether the owner must be sent an approval notice after the write.
    pub notify_owner: bool,
}

impl UpdatePlan {
    pub fn performs(&self, transition: Transition) -> bool {
        self.transitions.contains(&transition)
    }
}

/// Plan an update of a project owned by `owner_id` whose stored flags are
/// `current`.
///
/// `edits_fields` is true when the call also rewrites descriptive fields,
/// which needs [`Operation::Update`] permission judged against the *stored*
/// approval. Each flag that actually changes needs its own admin permission.
pub fn plan_update(
    principal: &Principal,
    owner_id: DbId,
    current: LifecycleFlags,
    request: &FlagRequest,
    edits_fields: bool,
) -> Result<UpdatePlan, CoreError> {
    let access = ProjectAccess {
        owner_id,
        approved: current.approved,
    };

    if edits_fields {
        authorize(principal, Operation::Update, Some(&access))?;
    }

    let next = LifecycleFlags {
        approved: request.approved.unwrap_or(current.approved),
        complete: request.complete.unwrap_or(current.complete),
    };

    let mut transitions = Vec::new();

    // Reopen before revoking, approve before completing, so that every
    // intermediate state is one the diagram above allows.
    if current.complete && !next.complete {
        authorize(principal, Operation::SetComplete, Some(&access))?;
        transitions.push(Transition::Reopen);
    }
    if current.approved != next.approved {
        authorize(principal, Operation::SetApproval, Some(&access))?;
        transitions.push(if next.approved {
            Transition::Approve
        } else {
            Transition::Revoke
        });
    }
    if !current.complete && next.complete {
        authorize(principal, Operation::SetComplete, Some(&access))?;
        transitions.push(Transition::Complete);
    }

    if next.complete && !next.approved {
        let msg = if transitions.contains(&Transition::Complete) {
            "Only approved projects can be marked complete"
        } else {
            "Reopen the project before revoking its approval"
        };
        return Err(CoreError::Conflict(msg.to_string()));
    }

    let notify_owner = request.notify_approved && transitions.contains(&Transition::Approve);

    Ok(UpdatePlan {
        flags: next,
        transitions,
        notify_owner,
    })
}

/// Check that `principal` may ask the admins to approve a project.
///
/// Only the owner may ask, and only while the project is not yet approved.
pub fn request_approval(
    principal: &Principal,
    owner_id: DbId,
    current: LifecycleFlags,
) -> Result<(), CoreError> {
    let access = ProjectAccess {
        owner_id,
        approved: current.approved,
    };
    authorize(principal, Operation::RequestApproval, Some(&access))?;

    if current.approved {
        return Err(CoreError::Conflict(
            "Project is already approved".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const OWNER: DbId = 1;

    fn owner() -> Principal {
        Principal::new(OWNER, false)
    }

    fn admin() -> Principal {
        Principal::new(2, true)
    }

    fn pipeline() -> LifecycleFlags {
        LifecycleFlags::new(false, false)
    }

    fn active() -> LifecycleFlags {
        LifecycleFlags::new(true, false)
    }

    fn complete() -> LifecycleFlags {
        LifecycleFlags::new(true, true)
    }

    fn set_approved(approved: bool, notify: bool) -> FlagRequest {
        FlagRequest {
            approved: Some(approved),
            complete: None,
            notify_approved: notify,
        }
    }

    fn set_complete(complete: bool) -> FlagRequest {
        FlagRequest {
            approved: None,
            complete: Some(complete),
            notify_approved: false,
        }
    }

    #[test]
    fn states_follow_flags() {
        assert_eq!(pipeline().state(), ProjectState::Pipeline);
        assert_eq!(active().state(), ProjectState::Active);
        assert_eq!(complete().state(), ProjectState::Complete);
        assert_eq!(
            LifecycleFlags::new(false, true).state(),
            ProjectState::Pipeline
        );
    }

    #[test]
    fn admin_approval_with_notify_notifies_owner() {
        let plan = plan_update(&admin(), OWNER, pipeline(), &set_approved(true, true), false)
            .unwrap();
        assert_eq!(plan.flags, active());
        assert_eq!(plan.transitions, vec![Transition::Approve]);
        assert!(plan.notify_owner);
    }

    #[test]
    fn approval_without_notify_is_silent() {
        let plan = plan_update(&admin(), OWNER, pipeline(), &set_approved(true, false), false)
            .unwrap();
        assert!(plan.performs(Transition::Approve));
        assert!(!plan.notify_owner);
    }

    #[test]
    fn re_approving_does_not_notify_again() {
        let plan = plan_update(&admin(), OWNER, active(), &set_approved(true, true), false)
            .unwrap();
        assert!(plan.transitions.is_empty());
        assert!(!plan.notify_owner);
    }

    #[test]
    fn revoking_returns_to_pipeline_without_notice() {
        let plan = plan_update(&admin(), OWNER, active(), &set_approved(false, true), false)
            .unwrap();
        assert_eq!(plan.flags.state(), ProjectState::Pipeline);
        assert_eq!(plan.transitions, vec![Transition::Revoke]);
        assert!(!plan.notify_owner);
    }

    #[test]
    fn completing_and_reopening() {
        let done = plan_update(&admin(), OWNER, active(), &set_complete(true), false).unwrap();
        assert_eq!(done.transitions, vec![Transition::Complete]);

        let reopened = plan_update(&admin(), OWNER, complete(), &set_complete(false), false)
            .unwrap();
        assert_eq!(reopened.flags, active());
        assert_eq!(reopened.transitions, vec![Transition::Reopen]);
    }

    #[test]
    fn completing_a_pipeline_project_conflicts() {
        let err = plan_update(&admin(), OWNER, pipeline(), &set_complete(true), false).unwrap_err();
        assert_matches!(err, CoreError::Conflict(msg) if msg.contains("approved"));
    }

    #[test]
    fn revoking_a_complete_project_conflicts() {
        let err = plan_update(&admin(), OWNER, complete(), &set_approved(false, false), false)
            .unwrap_err();
        assert_matches!(err, CoreError::Conflict(msg) if msg.contains("Reopen"));
    }

    #[test]
    fn approve_and_complete_in_one_call_is_ordered() {
        let request = FlagRequest {
            approved: Some(true),
            complete: Some(true),
            notify_approved: true,
        };
        let plan = plan_update(&admin(), OWNER, pipeline(), &request, true).unwrap();
        assert_eq!(plan.transitions, vec![Transition::Approve, Transition::Complete]);
        assert!(plan.notify_owner);
    }

    #[test]
    fn reopen_and_revoke_in_one_call_is_ordered() {
        let request = FlagRequest {
            approved: Some(false),
            complete: Some(false),
            notify_approved: false,
        };
        let plan = plan_update(&admin(), OWNER, complete(), &request, false).unwrap();
        assert_eq!(plan.transitions, vec![Transition::Reopen, Transition::Revoke]);
        assert_eq!(plan.flags, pipeline());
    }

    #[test]
    fn owner_cannot_flip_flags() {
        assert_matches!(
            plan_update(&owner(), OWNER, pipeline(), &set_approved(true, false), false),
            Err(CoreError::Unauthorized(_))
        );
        assert_matches!(
            plan_update(&owner(), OWNER, active(), &set_complete(true), false),
            Err(CoreError::Unauthorized(_))
        );
    }

    #[test]
    fn owner_echoing_stored_flags_is_allowed() {
        let request = FlagRequest {
            approved: Some(false),
            complete: Some(false),
            notify_approved: false,
        };
        let plan = plan_update(&owner(), OWNER, pipeline(), &request, true).unwrap();
        assert!(plan.transitions.is_empty());
    }

    #[test]
    fn owner_field_edit_rejected_once_approved() {
        assert_matches!(
            plan_update(&owner(), OWNER, active(), &FlagRequest::default(), true),
            Err(CoreError::Unauthorized(_))
        );
        assert!(plan_update(&admin(), OWNER, active(), &FlagRequest::default(), true).is_ok());
    }

    #[test]
    fn request_approval_rules() {
        assert!(request_approval(&owner(), OWNER, pipeline()).is_ok());
        assert_matches!(
            request_approval(&owner(), OWNER, active()),
            Err(CoreError::Conflict(_))
        );
        assert_matches!(
            request_approval(&admin(), OWNER, pipeline()),
            Err(CoreError::Unauthorized(_))
        );
    }
}
