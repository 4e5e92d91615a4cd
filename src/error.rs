//! Error types for the email router.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Classification error: {0}")]
    Classification(#[from] ClassificationError),

    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Failures while asking the classification endpoint for a department.
///
/// None of these escape the lenient `classify` path; they all map to
/// [`Department::Support`](crate::classify::Department::Support).
#[derive(Debug, thiserror::Error)]
pub enum ClassificationError {
    /// Endpoint answered with a non-success status.
    #[error("Classification endpoint returned HTTP {status}")]
    Http { status: u16 },

    /// Request never produced a response (DNS, connect, TLS, timeout).
    #[error("Classification request failed: {0}")]
    Transport(String),

    /// Response body was not the expected JSON document.
    #[error("Failed to decode classification response: {0}")]
    Decode(String),

    #[error("Unknown department label: {0}")]
    UnknownDepartment(String),
}

/// Failures while handing a message to the mail transport.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("No recipient resolved for message")]
    MissingRecipient,

    #[error("Invalid {field} address: {reason}")]
    InvalidAddress { field: String, reason: String },

    #[error("Failed to build email: {0}")]
    Build(String),

    /// Authentication rejection, network error, or provider rejection.
    #[error("SMTP send failed: {0}")]
    Transport(String),

    #[error("Mail send task failed: {0}")]
    Join(String),
}

/// Result type alias for the router.
pub type Result<T> = std::result::Result<T, Error>;
