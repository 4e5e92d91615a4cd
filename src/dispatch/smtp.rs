//! SMTP transport via lettre.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use secrecy::ExposeSecret;

use crate::config::SmtpProfile;
use crate::dispatch::{MailTransport, OutboundMessage};
use crate::error::DispatchError;

/// Install the ring crypto provider for rustls if nothing is installed yet.
pub fn ensure_crypto_provider() {
    // Err means another provider is already installed.
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// Authenticated STARTTLS submission against a fixed provider profile.
///
/// A fresh session is opened for every message.
#[derive(Debug, Clone)]
pub struct SmtpMailer {
    profile: SmtpProfile,
}

impl SmtpMailer {
    pub fn new(profile: SmtpProfile) -> Self {
        ensure_crypto_provider();
        Self { profile }
    }

    pub fn profile(&self) -> &SmtpProfile {
        &self.profile
    }
}

/// Build the lettre message: `from` is the sender account, body is plain text.
pub fn build_message(message: &OutboundMessage) -> Result<Message, DispatchError> {
    let to = message.recipient()?;

    let from: Mailbox = message
        .sender
        .email
        .parse()
        .map_err(|e| DispatchError::InvalidAddress {
            field: "from".into(),
            reason: format!("{e}"),
        })?;
    let to: Mailbox = to.parse().map_err(|e| DispatchError::InvalidAddress {
        field: "to".into(),
        reason: format!("{e}"),
    })?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(message.subject.as_str())
        .header(ContentType::TEXT_PLAIN)
        .body(message.body.clone())
        .map_err(|e| DispatchError::Build(e.to_string()))
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, message: &OutboundMessage) -> Result<(), DispatchError> {
        let email = build_message(message)?;
        let creds = Credentials::new(
            message.sender.email.clone(),
            message.sender.password.expose_secret().to_string(),
        );
        let profile = self.profile.clone();

        // lettre's SmtpTransport is blocking.
        tokio::task::spawn_blocking(move || {
            let transport = SmtpTransport::starttls_relay(&profile.host)
                .map_err(|e| DispatchError::Transport(format!("SMTP relay error: {e}")))?
                .port(profile.port)
                .credentials(creds)
                .build();

            transport
                .send(&email)
                .map(|_| ())
                .map_err(|e| DispatchError::Transport(e.to_string()))
        })
        .await
        .map_err(|e| DispatchError::Join(e.to_string()))?
    }
}
