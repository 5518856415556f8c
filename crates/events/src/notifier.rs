//! The notification seam and the notices it carries.

use async_trait::async_trait;
use shootbook_core::types::DbId;

/// Error type for notification dispatch failures.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),

    /// Some recipients of a multi-recipient notice were not reached. The
    /// others were.
    #[error("Delivery failed for {} of {attempted} recipients: {}", .failed.len(), .failed.join("; "))]
    Undelivered {
        attempted: usize,
        /// `address: reason` for each failure.
        failed: Vec<String>,
    },
}

/// Sent to every admin when an owner asks for a project to be approved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalRequestNotice {
    pub requester_name: String,
    pub project_name: String,
    pub project_id: DbId,
    /// Admin email addresses. Empty entries are skipped.
    pub recipients: Vec<String>,
    /// Where the reviewer can open the project.
    pub link: String,
}

/// Sent to the owner when an admin approves their project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalGrantedNotice {
    pub owner_name: String,
    pub project_name: String,
    pub project_id: DbId,
    pub recipient: String,
    pub link: String,
}

impl ApprovalRequestNotice {
    pub fn subject(&self) -> String {
        format!("Approval request for {}", self.project_name)
    }

    pub fn body(&self) -> String {
        format!(
            "{} has requested approval for the project \"{}\".\n\nReview it here: {}\n",
            self.requester_name, self.project_name, self.link
        )
    }
}

impl ApprovalGrantedNotice {
    pub fn subject(&self) -> String {
        format!("{} has been approved!", self.project_name)
    }

    pub fn body(&self) -> String {
        format!(
            "Hi {},\n\nYour project \"{}\" has been approved.\n\nView it here: {}\n",
            self.owner_name, self.project_name, self.link
        )
    }
}

/// Dispatches lifecycle notices to people.
///
/// Implementations deliver synchronously with respect to the caller: when a
/// method returns `Ok`, every deliverable recipient has been handed off.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Short name of the delivery channel, reported by the health check.
    fn channel(&self) -> &'static str;

    async fn send_approval_request(&self, notice: &ApprovalRequestNotice)
        -> Result<(), NotifyError>;

    async fn send_approval_granted(&self, notice: &ApprovalGrantedNotice)
        -> Result<(), NotifyError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_notice_text() {
        let notice = ApprovalRequestNotice {
            requester_name: "Olive".to_string(),
            project_name: "Launch Ad".to_string(),
            project_id: 7,
            recipients: vec!["ada@studio.test".to_string()],
            link: "http://localhost:3000/projects/7".to_string(),
        };
        assert_eq!(notice.subject(), "Approval request for Launch Ad");
        assert!(notice.body().starts_with("Olive has requested approval"));
        assert!(notice.body().contains("http://localhost:3000/projects/7"));
    }

    #[test]
    fn granted_notice_text() {
        let notice = ApprovalGrantedNotice {
            owner_name: "Olive".to_string(),
            project_name: "Launch Ad".to_string(),
            project_id: 7,
            recipient: "olive@studio.test".to_string(),
            link: "http://localhost:3000/projects/7".to_string(),
        };
        assert_eq!(notice.subject(), "Launch Ad has been approved!");
        assert!(notice.body().starts_with("Hi Olive,"));
    }

    #[test]
    fn error_display_undelivered() {
        let err = NotifyError::Undelivered {
            attempted: 3,
            failed: vec!["bo@studio.test: mailbox full".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Delivery failed for 1 of 3 recipients: bo@studio.test: mailbox full"
        );
    }

    #[test]
    fn error_display_build() {
        let err = NotifyError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "Email build error: missing body");
    }
}
