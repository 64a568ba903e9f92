use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, warn};

use super::{Delivery, NotificationError, Notifier, OutboundEmail};
use crate::config::MailConfig;

struct Sender {
    from: Mailbox,
    domain: String,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

/// Sends notifications through the configured SMTP relay.
///
/// Without credentials the notifier still constructs, but every send fails
/// with [`NotificationError::NotConfigured`].
pub struct SmtpNotifier {
    sender: Option<Sender>,
    recipient: Option<String>,
}

impl SmtpNotifier {
    pub fn from_config(config: &MailConfig) -> Result<Self, NotificationError> {
        let recipient = config.default_recipient().map(str::to_string);

        let Some((user, password)) = config.credentials() else {
            warn!("APP_MAIL_USER or APP_MAIL_PASSWORD not set; email notifications are disabled");
            return Ok(Self {
                sender: None,
                recipient,
            });
        };

        let from = match parse_mailbox(user) {
            Ok(from) => from,
            Err(err) => {
                warn!(
                    error = %err,
                    "APP_MAIL_USER is not a mailbox; email notifications are disabled"
                );
                return Ok(Self {
                    sender: None,
                    recipient,
                });
            }
        };
        let domain = user
            .rsplit_once('@')
            .map(|(_, domain)| domain.to_string())
            .unwrap_or_else(|| "localhost".to_string());

        // Port 465 speaks TLS from the first byte; anything else upgrades via STARTTLS.
        let builder = if config.port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        }
        .map_err(|err| NotificationError::Transport(err.to_string()))?;

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(user.to_string(), password.to_string()))
            .build();

        Ok(Self {
            sender: Some(Sender {
                from,
                domain,
                transport,
            }),
            recipient,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.sender.is_some()
    }

    /// Open a connection to the relay and authenticate without sending mail.
    pub async fn verify(&self) -> Result<(), NotificationError> {
        let sender = self
            .sender
            .as_ref()
            .ok_or(NotificationError::NotConfigured)?;
        let reachable = sender
            .transport
            .test_connection()
            .await
            .map_err(|err| NotificationError::Transport(err.to_string()))?;
        if reachable {
            Ok(())
        } else {
            Err(NotificationError::Transport(
                "relay refused the connection".to_string(),
            ))
        }
    }
}

impl std::fmt::Debug for SmtpNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpNotifier")
            .field("configured", &self.is_configured())
            .field("recipient", &self.recipient)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, email: OutboundEmail) -> Result<Delivery, NotificationError> {
        let sender = self
            .sender
            .as_ref()
            .ok_or(NotificationError::NotConfigured)?;
        let recipient = email
            .recipient
            .as_deref()
            .or(self.recipient.as_deref())
            .ok_or(NotificationError::NoRecipient)?;

        let message_id = format!("<{}@{}>", uuid::Uuid::new_v4().simple(), sender.domain);
        let message = Message::builder()
            .from(sender.from.clone())
            .to(parse_mailbox(recipient)?)
            .subject(email.subject)
            .message_id(Some(message_id.clone()))
            .header(ContentType::TEXT_HTML)
            .body(email.html)
            .map_err(|err| NotificationError::Message(err.to_string()))?;

        debug!(%recipient, %message_id, "sending notification");
        sender
            .transport
            .send(message)
            .await
            .map_err(|err| NotificationError::Transport(err.to_string()))?;

        Ok(Delivery { message_id })
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotificationError> {
    address
        .parse::<Mailbox>()
        .map_err(|err| NotificationError::InvalidAddress {
            address: address.to_string(),
            reason: err.to_string(),
        })
}
