//! Shared types for the processing pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::routing::RoutingDecision;

/// An email to classify and forward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundEmail {
    /// Correlates log lines for this email.
    pub id: Uuid,
    pub subject: String,
    pub body: String,
}

impl InboundEmail {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Outcome of running one email through the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedEmail {
    pub id: Uuid,
    pub decision: RoutingDecision,
    /// Whether the transport accepted the message.
    pub delivered: bool,
    /// Why delivery did not happen, if it didn't.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    pub processed_at: DateTime<Utc>,
}
