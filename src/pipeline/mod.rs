//! Single-email processing pipeline.
//!
//! Every email flows through:
//! 1. `Router::decide()` — classify + resolve recipient
//! 2. `Dispatcher::try_dispatch()` — one SMTP send, no retry
//!
//! One email per call; nothing is queued or persisted.

pub mod processor;
pub mod types;

pub use processor::EmailProcessor;
pub use types::{InboundEmail, ProcessedEmail};
