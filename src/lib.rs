//! Email router — classify an email into a department with a generative
//! text API, pick the department's address, and forward the email over SMTP.

pub mod classify;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod pipeline;
pub mod routing;

pub use classify::{ClassificationRequest, Department, DepartmentClassifier, GeminiClassifier, classify};
pub use dispatch::{Dispatcher, MailTransport, OutboundMessage, SenderCredentials, SmtpMailer, dispatch};
pub use pipeline::{EmailProcessor, InboundEmail, ProcessedEmail};
pub use routing::{DepartmentDirectory, MarketingRoute, Router, RoutingDecision, RoutingPolicy, route};
