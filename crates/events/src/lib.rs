//! Outbound notifications for the shoot booking service.
//!
//! - [`Notifier`] -- the dispatch seam handlers talk to.
//! - [`delivery`] -- concrete channels: SMTP email and a logging fallback
//!   used when no mail server is configured.

pub mod delivery;
pub mod notifier;

pub use delivery::email::{EmailConfig, EmailNotifier};
pub use delivery::log::LogNotifier;
pub use notifier::{ApprovalGrantedNotice, ApprovalRequestNotice, Notifier, NotifyError};
