//! Gemini `generateContent` client used for classification.
//!
//! Only the slice of the wire format this crate touches is modelled. Every
//! response level is optional so that an unexpected shape decodes cleanly
//! and surfaces as [`ExtractedText::Absent`] instead of an error.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::classify::{
    ClassificationRequest, Department, DepartmentClassifier, build_prompt, department_from_text,
};
use crate::config::ClassifierConfig;
use crate::error::ClassificationError;

// ── Wire types ──────────────────────────────────────────────────────

/// `{contents: [{parts: [{text}]}]}`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GenerateContentRequest {
    pub contents: Vec<RequestContent>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RequestContent {
    pub parts: Vec<RequestPart>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RequestPart {
    pub text: String,
}

impl GenerateContentRequest {
    /// A single-turn request carrying one text part.
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.into(),
                }],
            }],
        }
    }
}

/// `{candidates: [{content: {parts: [{text}]}}]}`
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

/// Text pulled from the first part of the first candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedText {
    Present(String),
    /// Some level of the response was missing or empty.
    Absent,
}

impl ExtractedText {
    /// The extracted text, or `""` when absent.
    pub fn as_str(&self) -> &str {
        match self {
            ExtractedText::Present(text) => text,
            ExtractedText::Absent => "",
        }
    }
}

impl GenerateContentResponse {
    /// First candidate → content → first part → text.
    pub fn first_text(&self) -> ExtractedText {
        self.candidates
            .as_deref()
            .and_then(|c| c.first())
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.as_deref())
            .and_then(|p| p.first())
            .and_then(|p| p.text.clone())
            .filter(|t| !t.is_empty())
            .map_or(ExtractedText::Absent, ExtractedText::Present)
    }
}

// ── Client ──────────────────────────────────────────────────────────

/// Classifier backed by the Gemini `generateContent` endpoint.
pub struct GeminiClassifier {
    client: reqwest::Client,
    config: ClassifierConfig,
}

impl GeminiClassifier {
    pub fn new(config: ClassifierConfig) -> Result<Self, ClassificationError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClassificationError::Transport(format!("failed to build client: {e}")))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Issue one `generateContent` call and decode the response.
    pub async fn generate(
        &self,
        request: &ClassificationRequest,
    ) -> Result<GenerateContentResponse, ClassificationError> {
        let payload =
            GenerateContentRequest::from_prompt(build_prompt(&request.subject, &request.body));

        let resp = self
            .client
            .post(self.config.endpoint())
            .query(&[("key", request.api_key.expose_secret())])
            .json(&payload)
            .send()
            .await
            // The URL carries the API key as a query parameter.
            .map_err(|e| ClassificationError::Transport(e.without_url().to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), body = %body, "Classification endpoint error body");
            return Err(ClassificationError::Http {
                status: status.as_u16(),
            });
        }

        let raw = resp
            .text()
            .await
            .map_err(|e| ClassificationError::Transport(e.without_url().to_string()))?;
        debug!(raw_response = %raw, "AI response");

        serde_json::from_str(&raw).map_err(|e| ClassificationError::Decode(e.to_string()))
    }
}

#[async_trait]
impl DepartmentClassifier for GeminiClassifier {
    async fn try_classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<Department, ClassificationError> {
        let response = self.generate(request).await?;

        let extracted = response.first_text();
        if extracted == ExtractedText::Absent {
            debug!("Response carried no candidate text");
        }
        debug!(text = extracted.as_str(), "Raw department text");

        let department = department_from_text(extracted.as_str());
        info!(
            department = %department,
            model = %self.config.model,
            "Classified email"
        );
        Ok(department)
    }
}
