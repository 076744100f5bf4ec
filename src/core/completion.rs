//! Completion client: one question in, one answer (or failure) out.
//!
//! The controller only cares whether a call succeeded. [`ServiceErrorKind`]
//! exists for the log file, not for branching.

use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::api::{ErrorResponse, GenerateContentRequest, GenerateContentResponse};
use crate::utils::url::generate_content_url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceErrorKind {
    /// Connect failures, timeouts, dropped bodies.
    Network,
    /// 401 / 403.
    Auth,
    /// 429, quota exhausted.
    RateLimit,
    /// 5xx.
    Server,
    /// 400, usually a bad model name.
    InvalidRequest,
    /// 2xx with a body we could not use.
    Malformed,
    Unknown,
}

impl ServiceErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceErrorKind::Network => "network",
            ServiceErrorKind::Auth => "auth",
            ServiceErrorKind::RateLimit => "rate_limit",
            ServiceErrorKind::Server => "server",
            ServiceErrorKind::InvalidRequest => "invalid_request",
            ServiceErrorKind::Malformed => "malformed",
            ServiceErrorKind::Unknown => "unknown",
        }
    }

    fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            400 => ServiceErrorKind::InvalidRequest,
            401 | 403 => ServiceErrorKind::Auth,
            429 => ServiceErrorKind::RateLimit,
            500..=599 => ServiceErrorKind::Server,
            _ => ServiceErrorKind::Unknown,
        }
    }
}

/// Any failure of the external completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceError {
    pub kind: ServiceErrorKind,
    pub message: String,
}

impl ServiceError {
    pub fn new(kind: ServiceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Network, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Malformed, message)
    }

    fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network(format!("Request timeout: {err}"))
        } else if err.is_connect() {
            Self::network(format!("Connection failed: {err}"))
        } else if err.is_decode() || err.is_body() {
            Self::network(format!("Failed to read response: {err}"))
        } else {
            Self::new(ServiceErrorKind::Unknown, format!("Request failed: {err}"))
        }
    }

    fn from_status(status: StatusCode, body: &str) -> Self {
        let detail = extract_error_summary(body);
        Self::new(
            ServiceErrorKind::from_status(status),
            format!("HTTP {}: {}", status.as_u16(), detail),
        )
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind.as_str())
    }
}

impl StdError for ServiceError {}

/// Pull a one-line summary out of an error body, falling back to the raw
/// text with whitespace collapsed.
fn extract_error_summary(body: &str) -> String {
    let summary = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .map(|response| match response.error.status {
            Some(status) if !response.error.message.is_empty() => {
                format!("{} [{}]", response.error.message, status)
            }
            Some(status) => status,
            None => response.error.message,
        })
        .unwrap_or_else(|| body.to_string());

    let collapsed = summary.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        "<no body>".to_string()
    } else {
        collapsed
    }
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Ask one question under the given system instruction.
    ///
    /// Both strings are forwarded untouched. Implementations must not cache:
    /// repeating a question repeats the call.
    async fn complete(
        &self,
        question: &str,
        system_instruction: &str,
    ) -> Result<String, ServiceError>;

    fn model_id(&self) -> &str;
}

/// Connection settings for [`GeminiClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionSettings {
    pub base_url: String,
    pub model: String,
    /// `None` waits for the service indefinitely.
    pub timeout: Option<Duration>,
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, settings: &CompletionSettings) -> reqwest::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            api_key: api_key.into(),
            endpoint: generate_content_url(&settings.base_url, &settings.model),
            model: settings.model.clone(),
        })
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn complete(
        &self,
        question: &str,
        system_instruction: &str,
    ) -> Result<String, ServiceError> {
        let request = GenerateContentRequest::new(question, system_instruction);
        debug!(
            model = %self.model,
            question_len = question.len(),
            instruction_len = system_instruction.len(),
            "sending generateContent request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(ServiceError::from_reqwest)?;

        let status = response.status();
        let body = response.text().await.map_err(ServiceError::from_reqwest)?;

        if !status.is_success() {
            return Err(ServiceError::from_status(status, &body));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| ServiceError::malformed(format!("Failed to parse response: {e}")))?;

        parsed
            .first_text()
            .ok_or_else(|| ServiceError::malformed("Response contained no answer text"))
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
