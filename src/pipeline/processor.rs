//! Email processor — routes an inbound email and forwards it.
//!
//! Flow:
//! 1. Router (classification + recipient resolution)
//! 2. Dispatcher (single send to the resolved recipient)
//!
//! Neither step can fail the call: classification degrades to `support`
//! and delivery failures are recorded on the returned [`ProcessedEmail`].

use chrono::Utc;
use secrecy::SecretString;
use tracing::{Instrument, error, info, info_span};

use crate::classify::ClassificationRequest;
use crate::dispatch::{Dispatcher, OutboundMessage, SenderCredentials};
use crate::pipeline::types::{InboundEmail, ProcessedEmail};
use crate::routing::{DepartmentDirectory, Router, RoutingPolicy};

pub struct EmailProcessor {
    router: Router,
    dispatcher: Dispatcher,
}

impl EmailProcessor {
    pub fn new(router: Router, dispatcher: Dispatcher) -> Self {
        Self { router, dispatcher }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Classify, route and send one email.
    pub async fn process(
        &self,
        api_key: &SecretString,
        email: &InboundEmail,
        directory: &DepartmentDirectory,
        custom: Option<&dyn RoutingPolicy>,
        sender: &SenderCredentials,
    ) -> ProcessedEmail {
        let span = info_span!("process_email", id = %email.id);

        async {
            info!(subject = %email.subject, "Processing inbound email");

            let request = ClassificationRequest {
                api_key: api_key.clone(),
                subject: email.subject.clone(),
                body: email.body.clone(),
            };
            let decision = self.router.decide(&request, directory, custom).await;

            let outbound = OutboundMessage::new(
                decision.recipient.clone(),
                email.subject.as_str(),
                email.body.as_str(),
                sender.clone(),
            );

            let failure = match self.dispatcher.try_dispatch(&outbound).await {
                Ok(()) => None,
                Err(e) => {
                    error!(
                        department = %decision.department,
                        error = %e,
                        "Failed to forward email"
                    );
                    Some(e.to_string())
                }
            };

            ProcessedEmail {
                id: email.id,
                delivered: failure.is_none(),
                failure,
                decision,
                processed_at: Utc::now(),
            }
        }
        .instrument(span)
        .await
    }
}
