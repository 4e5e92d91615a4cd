//! Department classification.
//!
//! Flow for one email:
//! 1. `build_prompt()` — one natural-language instruction + subject/body
//! 2. `GeminiClassifier` — one `generateContent` call
//! 3. `extract::department_from_text()` — strip markdown, lowercase, match
//!
//! Classification never blocks delivery: the lenient [`DepartmentClassifier::classify`]
//! maps every failure to [`Department::Support`].

pub mod extract;
pub mod gemini;
pub mod prompt;

pub use extract::{department_from_text, normalize};
pub use gemini::{ExtractedText, GeminiClassifier, GenerateContentRequest, GenerateContentResponse};
pub use prompt::build_prompt;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::ClassifierConfig;
use crate::error::ClassificationError;

// ── Department ──────────────────────────────────────────────────────

/// Closed set of departments an email can be classified into.
///
/// `Support` is the universal fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Department {
    #[default]
    Support,
    Sales,
    Billing,
    Marketing,
}

impl Department {
    /// All departments, in prompt order.
    pub const ALL: [Department; 4] = [
        Department::Support,
        Department::Sales,
        Department::Billing,
        Department::Marketing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Support => "support",
            Department::Sales => "sales",
            Department::Billing => "billing",
            Department::Marketing => "marketing",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Department {
    type Err = ClassificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "support" => Ok(Department::Support),
            "sales" => Ok(Department::Sales),
            "billing" => Ok(Department::Billing),
            "marketing" => Ok(Department::Marketing),
            other => Err(ClassificationError::UnknownDepartment(other.to_string())),
        }
    }
}

// ── Request ─────────────────────────────────────────────────────────

/// Inputs for one classification. Created per call, dropped after use.
#[derive(Debug, Clone)]
pub struct ClassificationRequest {
    pub api_key: SecretString,
    pub subject: String,
    pub body: String,
}

impl ClassificationRequest {
    pub fn new(
        api_key: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            subject: subject.into(),
            body: body.into(),
        }
    }
}

// ── Classifier seam ─────────────────────────────────────────────────

/// Something that can turn an email into a [`Department`].
#[async_trait]
pub trait DepartmentClassifier: Send + Sync {
    /// Strict classification. Text without any department token is not an
    /// error; it yields `Support`.
    async fn try_classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<Department, ClassificationError>;

    /// Lenient classification: any error becomes `Support`.
    async fn classify(&self, request: &ClassificationRequest) -> Department {
        match self.try_classify(request).await {
            Ok(department) => department,
            Err(e) => {
                warn!(error = %e, "Classification failed, defaulting to support");
                Department::Support
            }
        }
    }
}

/// Classify one email against the default Gemini endpoint. Never fails.
pub async fn classify(api_key: &str, subject: &str, body: &str) -> Department {
    let classifier = match GeminiClassifier::new(ClassifierConfig::default()) {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Could not build classifier, defaulting to support");
            return Department::Support;
        }
    };
    classifier
        .classify(&ClassificationRequest::new(api_key, subject, body))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    #[async_trait]
    impl DepartmentClassifier for Failing {
        async fn try_classify(
            &self,
            _request: &ClassificationRequest,
        ) -> Result<Department, ClassificationError> {
            Err(ClassificationError::Http { status: 503 })
        }
    }

    #[test]
    fn department_default_is_support() {
        assert_eq!(Department::default(), Department::Support);
    }

    #[test]
    fn department_parse_is_case_insensitive() {
        assert_eq!("Billing".parse::<Department>().unwrap(), Department::Billing);
        assert_eq!(" SALES ".parse::<Department>().unwrap(), Department::Sales);
        assert!("legal".parse::<Department>().is_err());
    }

    #[test]
    fn department_display_matches_serde() {
        for department in Department::ALL {
            let json = serde_json::to_string(&department).unwrap();
            assert_eq!(json, format!("\"{department}\""));
        }
    }

    #[test]
    fn request_debug_hides_api_key() {
        let request = ClassificationRequest::new("super-secret-key", "Hi", "Body");
        let rendered = format!("{request:?}");
        assert!(!rendered.contains("super-secret-key"));
    }

    #[tokio::test]
    async fn lenient_classify_swallows_errors() {
        let request = ClassificationRequest::new("k", "s", "b");
        assert!(Failing.try_classify(&request).await.is_err());
        assert_eq!(Failing.classify(&request).await, Department::Support);
    }
}
