//! Outbound delivery of routed emails.
//!
//! [`Dispatcher::try_dispatch`] reports failures; [`Dispatcher::dispatch`]
//! logs and swallows them so a failed send never surfaces to the caller.

pub mod smtp;

pub use smtp::{SmtpMailer, ensure_crypto_provider};

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;
use tracing::{error, info};

use crate::config::SmtpProfile;
use crate::error::DispatchError;

/// Account the message is sent from. The address doubles as SMTP username.
#[derive(Debug, Clone)]
pub struct SenderCredentials {
    pub email: String,
    pub password: SecretString,
}

impl SenderCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// One plain-text email. Built once, sent once.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    /// Unresolved routing leaves this `None`; sending then fails.
    pub to: Option<String>,
    pub subject: String,
    pub body: String,
    pub sender: SenderCredentials,
}

impl OutboundMessage {
    pub fn new(
        to: Option<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
        sender: SenderCredentials,
    ) -> Self {
        Self {
            to,
            subject: subject.into(),
            body: body.into(),
            sender,
        }
    }

    /// The recipient, or `MissingRecipient`.
    pub fn recipient(&self) -> Result<&str, DispatchError> {
        self.to.as_deref().ok_or(DispatchError::MissingRecipient)
    }
}

/// Anything that can deliver an [`OutboundMessage`].
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, message: &OutboundMessage) -> Result<(), DispatchError>;
}

/// Sends routed emails through a [`MailTransport`]. No retries.
pub struct Dispatcher {
    transport: Arc<dyn MailTransport>,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn MailTransport>) -> Self {
        Self { transport }
    }

    /// Dispatcher backed by SMTP against `profile`.
    pub fn smtp(profile: SmtpProfile) -> Self {
        Self::new(Arc::new(SmtpMailer::new(profile)))
    }

    pub async fn try_dispatch(&self, message: &OutboundMessage) -> Result<(), DispatchError> {
        let to = message.recipient()?;
        self.transport.send(message).await?;
        info!(to = %to, "Email sent successfully");
        Ok(())
    }

    /// Send and log the outcome. Always returns normally.
    pub async fn dispatch(&self, message: &OutboundMessage) {
        if let Err(e) = self.try_dispatch(message).await {
            error!(
                to = message.to.as_deref().unwrap_or("<none>"),
                error = %e,
                "Failed to send email"
            );
        }
    }
}

/// Send one plain-text email through the default (Gmail) profile.
/// Failures are logged only.
pub async fn dispatch(
    to: Option<&str>,
    subject: &str,
    body: &str,
    sender_email: &str,
    sender_password: &str,
) {
    let message = OutboundMessage::new(
        to.map(str::to_string),
        subject,
        body,
        SenderCredentials::new(sender_email, sender_password),
    );
    Dispatcher::smtp(SmtpProfile::default())
        .dispatch(&message)
        .await;
}
