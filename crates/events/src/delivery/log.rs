//! Logging fallback used when no SMTP server is configured.

use async_trait::async_trait;

use crate::notifier::{ApprovalGrantedNotice, ApprovalRequestNotice, Notifier, NotifyError};

/// Writes each notice to the log instead of sending it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn channel(&self) -> &'static str {
        "log"
    }

    async fn send_approval_request(
        &self,
        notice: &ApprovalRequestNotice,
    ) -> Result<(), NotifyError> {
        for recipient in notice.recipients.iter().filter(|r| !r.trim().is_empty()) {
            tracing::info!(
                to = %recipient,
                project_id = notice.project_id,
                subject = %notice.subject(),
                link = %notice.link,
                "Approval request (email delivery not configured)",
            );
        }
        Ok(())
    }

    async fn send_approval_granted(
        &self,
        notice: &ApprovalGrantedNotice,
    ) -> Result<(), NotifyError> {
        if notice.recipient.trim().is_empty() {
            tracing::warn!(project_id = notice.project_id, "Owner has no email address");
            return Ok(());
        }
        tracing::info!(
            to = %notice.recipient,
            project_id = notice.project_id,
            subject = %notice.subject(),
            link = %notice.link,
            "Approval granted (email delivery not configured)",
        );
        Ok(())
    }
}
