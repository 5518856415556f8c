//! Completeness check run before an approval request is sent.

use crate::error::CoreError;
use crate::types::Timestamp;

pub const MISSING_JOB_NUMBER: &str = "Job number";
pub const MISSING_DUE_DATE: &str = "Due date";
pub const MISSING_SHOOT_START: &str = "Proposed shoot start date";
pub const MISSING_SHOOT_END: &str = "Proposed shoot end date";
pub const MISSING_FINALISED_CONCEPT: &str = "Concept needs to be finalised";
pub const MISSING_BUDGET: &str = "Budget";

/// The project fields an approval request depends on.
#[derive(Debug, Clone, Copy)]
pub struct ApprovalChecklist<'a> {
    pub job_number: Option<&'a str>,
    pub due_date: Option<Timestamp>,
    pub shoot_start: Option<Timestamp>,
    pub shoot_end: Option<Timestamp>,
    pub finalised_concept: bool,
    pub budget: Option<i16>,
}

/// List the labels of everything still missing, in form order.
pub fn missing_for_approval(checklist: &ApprovalChecklist<'_>) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if checklist.job_number.map_or(true, |j| j.trim().is_empty()) {
        missing.push(MISSING_JOB_NUMBER);
    }
    if checklist.due_date.is_none() {
        missing.push(MISSING_DUE_DATE);
    }
    if checklist.shoot_start.is_none() {
        missing.push(MISSING_SHOOT_START);
    }
    if checklist.shoot_end.is_none() {
        missing.push(MISSING_SHOOT_END);
    }
    if !checklist.finalised_concept {
        missing.push(MISSING_FINALISED_CONCEPT);
    }
    if checklist.budget.is_none() {
        missing.push(MISSING_BUDGET);
    }
    missing
}

/// Fail with a validation error naming every missing item.
pub fn ensure_ready_for_approval(checklist: &ApprovalChecklist<'_>) -> Result<(), CoreError> {
    let missing = missing_for_approval(checklist);
    if missing.is_empty() {
        return Ok(());
    }
    Err(CoreError::Validation(format!(
        "Please fill in the following values before requesting approval: {}",
        missing.join(", ")
    )))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Utc;

    use super::*;

    fn ready() -> ApprovalChecklist<'static> {
        let now = Utc::now();
        ApprovalChecklist {
            job_number: Some("JOB-001"),
            due_date: Some(now),
            shoot_start: Some(now),
            shoot_end: Some(now),
            finalised_concept: true,
            budget: Some(3),
        }
    }

    #[test]
    fn complete_checklist_passes() {
        assert!(missing_for_approval(&ready()).is_empty());
        assert!(ensure_ready_for_approval(&ready()).is_ok());
    }

    #[test]
    fn empty_checklist_lists_everything_in_order() {
        let empty = ApprovalChecklist {
            job_number: None,
            due_date: None,
            shoot_start: None,
            shoot_end: None,
            finalised_concept: false,
            budget: None,
        };
        assert_eq!(
            missing_for_approval(&empty),
            vec![
                MISSING_JOB_NUMBER,
                MISSING_DUE_DATE,
                MISSING_SHOOT_START,
                MISSING_SHOOT_END,
                MISSING_FINALISED_CONCEPT,
                MISSING_BUDGET,
            ]
        );
    }

    #[test]
    fn blank_job_number_counts_as_missing() {
        let checklist = ApprovalChecklist {
            job_number: Some("   "),
            ..ready()
        };
        assert_eq!(missing_for_approval(&checklist), vec![MISSING_JOB_NUMBER]);
    }

    #[test]
    fn error_names_missing_items() {
        let checklist = ApprovalChecklist {
            shoot_end: None,
            budget: None,
            ..ready()
        };
        let err = ensure_ready_for_approval(&checklist).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg)
            if msg.ends_with("Proposed shoot end date, Budget"));
    }
}
