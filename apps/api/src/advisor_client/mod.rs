//! Advisor client: the single point of entry for calls to the remote
//! text-generation service.
//!
//! No other module talks to the Gemini API directly. Handlers reach it through
//! the `AdviceGenerator` trait held in `AppState`, which lets tests swap in a fake.
//!
//! One request per call. There is no retry, no backoff and no caching of
//! identical prompts; a failure is terminal for the current request.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::advice::prompts::AdvicePrompt;

#[cfg(test)]
pub mod fake;

/// Model used when `GEMINI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gemini-pro";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("advice service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("advice service rejected credentials: {0}")]
    Authentication(String),

    #[error("advice service returned no text")]
    EmptyContent,
}

impl From<reqwest::Error> for AdvisorError {
    fn from(e: reqwest::Error) -> Self {
        AdvisorError::ServiceUnavailable(e.to_string())
    }
}

/// Text returned by the remote service, passed through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AdviceResult(pub String);

impl AdviceResult {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Explicit connection settings for the advisor. Built from `Config` at startup.
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    /// `None` means the call may block indefinitely.
    pub timeout: Option<Duration>,
}

#[async_trait]
pub trait AdviceGenerator: Send + Sync {
    async fn get_advice(&self, prompt: &AdvicePrompt) -> Result<AdviceResult, AdvisorError>;

    /// Model identifier, for logs.
    fn model(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, if it has any.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    error: GoogleErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    details: Vec<GoogleErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorDetail {
    reason: Option<String>,
}

/// Gemini `generateContent` client.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    config: AdvisorConfig,
}

impl GeminiClient {
    pub fn new(config: AdvisorConfig) -> Result<Self, AdvisorError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl AdviceGenerator for GeminiClient {
    async fn get_advice(&self, prompt: &AdvicePrompt) -> Result<AdviceResult, AdvisorError> {
        let request_body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart {
                    text: prompt.as_str(),
                }],
            }],
        };

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Advice service returned {}: {}", status, body);
            return Err(classify_failure(status, &body));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AdvisorError::ServiceUnavailable(format!("undecodable response: {e}")))?;

        if let Some(usage) = &body.usage_metadata {
            debug!(
                "Advice call succeeded: prompt_tokens={}, candidate_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        body.text().map(AdviceResult).ok_or(AdvisorError::EmptyContent)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

/// Maps a non-success response onto the two terminal failure kinds.
fn classify_failure(status: StatusCode, body: &str) -> AdvisorError {
    let parsed = serde_json::from_str::<GoogleError>(body).ok();
    let message = parsed
        .as_ref()
        .map(|e| e.error.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.to_string());

    let key_rejected = parsed.as_ref().is_some_and(|e| {
        e.error
            .details
            .iter()
            .any(|d| d.reason.as_deref() == Some("API_KEY_INVALID"))
            || e.error.message.contains("API key")
    });

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AdvisorError::Authentication(message),
        StatusCode::BAD_REQUEST if key_rejected => AdvisorError::Authentication(message),
        _ => AdvisorError::ServiceUnavailable(format!("status {}: {message}", status.as_u16())),
    }
}
