//! Configuration types.
//!
//! Everything is read from environment variables; unset or unparsable
//! optional values fall back to their defaults.

use std::time::Duration;

use secrecy::SecretString;

use crate::dispatch::SenderCredentials;
use crate::error::ConfigError;
use crate::routing::{DepartmentDirectory, MarketingRoute};

/// Default base URL of the generative language API.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model used for classification.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash-latest";

/// Classification endpoint configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierConfig {
    /// Scheme + host (+ optional port) of the API, without trailing slash.
    pub base_url: String,
    /// Model name inserted into the `generateContent` path.
    pub model: String,
    /// Request timeout. `None` keeps the HTTP client's default.
    pub timeout: Option<Duration>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            timeout: None,
        }
    }
}

impl ClassifierConfig {
    /// Build config from `GEMINI_BASE_URL`, `GEMINI_MODEL` and
    /// `GEMINI_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let base_url = std::env::var("GEMINI_BASE_URL")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or(defaults.base_url);

        let model = std::env::var("GEMINI_MODEL").unwrap_or(defaults.model);

        let timeout = std::env::var("GEMINI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs);

        Self {
            base_url,
            model,
            timeout,
        }
    }

    /// Full URL of the `generateContent` method for the configured model.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

/// SMTP provider profile the dispatcher authenticates against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpProfile {
    pub host: String,
    pub port: u16,
}

impl Default for SmtpProfile {
    fn default() -> Self {
        Self::gmail()
    }
}

impl SmtpProfile {
    /// Gmail submission endpoint (STARTTLS on 587).
    pub fn gmail() -> Self {
        Self {
            host: "smtp.gmail.com".to_string(),
            port: 587,
        }
    }

    /// Build from `EMAIL_SMTP_HOST` / `EMAIL_SMTP_PORT`, defaulting to Gmail.
    pub fn from_env() -> Self {
        let defaults = Self::gmail();

        let host = std::env::var("EMAIL_SMTP_HOST").unwrap_or(defaults.host);
        let port: u16 = std::env::var("EMAIL_SMTP_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);

        Self { host, port }
    }
}

/// Everything the `email-router` binary needs.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: SecretString,
    pub classifier: ClassifierConfig,
    pub smtp: SmtpProfile,
    pub sender: Option<SenderCredentials>,
    pub directory: DepartmentDirectory,
    pub marketing_route: MarketingRoute,
}

impl AppConfig {
    /// Build from the environment. `GEMINI_API_KEY` is required; sender
    /// credentials are only present when both `EMAIL_USERNAME` and
    /// `EMAIL_PASSWORD` are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map(SecretString::from)
            .map_err(|_| ConfigError::MissingEnvVar("GEMINI_API_KEY".to_string()))?;

        let sender = match (
            std::env::var("EMAIL_USERNAME"),
            std::env::var("EMAIL_PASSWORD"),
        ) {
            (Ok(email), Ok(password)) => Some(SenderCredentials::new(email, password)),
            _ => None,
        };

        let marketing_route = match std::env::var("ROUTE_MARKETING_DEDICATED") {
            Ok(v) => parse_bool("ROUTE_MARKETING_DEDICATED", &v)?.into(),
            Err(_) => MarketingRoute::default(),
        };

        Ok(Self {
            api_key,
            classifier: ClassifierConfig::from_env(),
            smtp: SmtpProfile::from_env(),
            sender,
            directory: DepartmentDirectory::from_env(),
            marketing_route,
        })
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected a boolean, got '{other}'"),
        }),
    }
}
