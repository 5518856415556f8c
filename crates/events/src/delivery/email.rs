//! Email notification delivery via SMTP.
//!
//! [`EmailNotifier`] wraps the `lettre` async SMTP transport to send
//! plain-text notices. Configuration is loaded from environment variables;
//! if `SMTP_HOST` is not set, [`EmailConfig::from_env`] returns `None` and
//! the server falls back to [`LogNotifier`](crate::LogNotifier).

use std::future::Future;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::notifier::{ApprovalGrantedNotice, ApprovalRequestNotice, Notifier, NotifyError};

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@shootbook.local";

/// Display name on every outgoing message.
pub const SENDER_NAME: &str = "Shoot Booking";

/// Configuration for the SMTP email delivery service.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set.
    ///
    /// | Variable        | Required | Default                    |
    /// |-----------------|----------|----------------------------|
    /// | `SMTP_HOST`     | yes      |                            |
    /// | `SMTP_PORT`     | no       | `587`                      |
    /// | `SMTP_FROM`     | no       | `noreply@shootbook.local`  |
    /// | `SMTP_USER`     | no       |                            |
    /// | `SMTP_PASSWORD` | no       |                            |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// EmailNotifier
// ---------------------------------------------------------------------------

/// Sends lifecycle notices by email, one message per recipient.
pub struct EmailNotifier {
    sender: Mailbox,
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailNotifier {
    /// Build the SMTP transport. No connection is made until the first send.
    pub fn new(config: EmailConfig) -> Result<Self, NotifyError> {
        let sender = sender_mailbox(&config.from_address)?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port);
        if let (Some(user), Some(pass)) = (config.smtp_user, config.smtp_password) {
            builder = builder.credentials(Credentials::new(user, pass));
        }

        Ok(Self {
            sender,
            mailer: builder.build(),
        })
    }

    async fn deliver(&self, to: &str, subject: &str, body: String) -> Result<(), NotifyError> {
        if to.trim().is_empty() {
            tracing::warn!(subject, "Skipping notification recipient without an email address");
            return Ok(());
        }
        let message = build_message(&self.sender, to, subject, body)?;
        self.mailer.send(message).await?;
        tracing::info!(to, subject, "Notification email sent");
        Ok(())
    }
}

fn sender_mailbox(from_address: &str) -> Result<Mailbox, NotifyError> {
    let address: Address = from_address.parse()?;
    Ok(Mailbox::new(Some(SENDER_NAME.to_string()), address))
}

fn build_message(
    sender: &Mailbox,
    to: &str,
    subject: &str,
    body: String,
) -> Result<Message, NotifyError> {
    Message::builder()
        .from(sender.clone())
        .to(to.parse::<Mailbox>()?)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(body)
        .map_err(|e| NotifyError::Build(e.to_string()))
}

/// Send to every recipient, even after a failure, and report the failures
/// together.
async fn deliver_each<'a, F, Fut>(recipients: &'a [String], mut send: F) -> Result<(), NotifyError>
where
    F: FnMut(&'a str) -> Fut,
    Fut: Future<Output = Result<(), NotifyError>>,
{
    let mut failed = Vec::new();
    for recipient in recipients {
        if let Err(e) = send(recipient.as_str()).await {
            tracing::error!(to = %recipient, error = %e, "Notification email failed");
            failed.push(format!("{recipient}: {e}"));
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(NotifyError::Undelivered {
            attempted: recipients.len(),
            failed,
        })
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    fn channel(&self) -> &'static str {
        "smtp"
    }

    async fn send_approval_request(
        &self,
        notice: &ApprovalRequestNotice,
    ) -> Result<(), NotifyError> {
        let subject = notice.subject();
        deliver_each(&notice.recipients, |to| self.deliver(to, &subject, notice.body())).await
    }

    async fn send_approval_granted(
        &self,
        notice: &ApprovalGrantedNotice,
    ) -> Result<(), NotifyError> {
        self.deliver(&notice.recipient, &notice.subject(), notice.body())
            .await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
