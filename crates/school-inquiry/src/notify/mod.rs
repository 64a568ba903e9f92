//! Best-effort email notifications for new inquiries.

mod smtp;
pub mod templates;

use async_trait::async_trait;

pub use smtp::SmtpNotifier;

/// A rendered message ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub subject: String,
    pub html: String,
    /// Overrides the configured default recipient.
    pub recipient: Option<String>,
}

/// Receipt returned by the relay for an accepted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub message_id: String,
}

/// Outbound notification hook (SMTP in production, recorders in tests).
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, email: OutboundEmail) -> Result<Delivery, NotificationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("mail credentials are not configured")]
    NotConfigured,
    #[error("no recipient configured for notifications")]
    NoRecipient,
    #[error("invalid mail address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },
    #[error("unable to build message: {0}")]
    Message(String),
    #[error("mail transport failed: {0}")]
    Transport(String),
}
