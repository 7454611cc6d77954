//! Pure OpenAI REST API client
//!
//! A minimal client for OpenAI's chat completions endpoint in structured
//! output mode. No domain-specific logic lives here.
//!
//! # Type-Safe Structured Output
//!
//! ```rust,ignore
//! use openai_client::OpenAIClient;
//! use schemars::JsonSchema;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, JsonSchema)]
//! struct Citation {
//!     title: String,
//! }
//!
//! #[derive(Deserialize, JsonSchema)]
//! struct Citations {
//!     citations: Vec<Citation>,
//! }
//!
//! let client = OpenAIClient::from_env()?;
//!
//! // Schema generated automatically from type!
//! let found: Citations = client
//!     .extract::<Citations>("gpt-4o-mini", "You list citations.", "Text: ...")
//!     .await?;
//! ```

pub mod error;
pub mod schema;
pub mod types;

pub use error::{OpenAIError, Result};
pub use schema::StructuredOutput;
pub use types::*;

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Upper bound on one chat completion round trip.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Pure OpenAI API client.
#[derive(Clone)]
pub struct OpenAIClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl OpenAIClient {
    /// Create a new OpenAI client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create from environment variable `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| OpenAIError::Config("OPENAI_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the per-request timeout. A request that exceeds it fails with
    /// [`OpenAIError::Network`].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Type-safe structured output extraction.
    ///
    /// Generates a strict JSON schema from `T`, sends it with the prompt,
    /// and deserializes the payload. A payload that does not deserialize
    /// into `T` is reported as [`OpenAIError::Parse`].
    pub async fn extract<T: StructuredOutput>(
        &self,
        model: &str,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Result<T> {
        let schema = T::openai_schema();

        debug!(
            type_name = %T::type_name(),
            schema = %serde_json::to_string(&schema).unwrap_or_default(),
            "Generated OpenAI schema for extraction"
        );

        let request = StructuredRequest::new(
            model,
            system_prompt,
            user_prompt,
            T::type_name(),
            schema,
        );
        let json_str = self.structured_output(request).await?;

        parse_payload(&json_str)
    }

    /// Structured output with JSON schema.
    ///
    /// Returns the raw JSON payload of the first choice. A refusal or a
    /// null/empty content field is an error, never an empty string.
    pub async fn structured_output(&self, request: StructuredRequest) -> Result<String> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "OpenAI request failed");
                OpenAIError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "OpenAI structured output error");
            return Err(OpenAIError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let chat_response: types::ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OpenAIError::Network(e.to_string())
                } else {
                    OpenAIError::Parse(e.to_string())
                }
            })?;

        if let Some(usage) = &chat_response.usage {
            debug!(
                model = %request.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                duration_ms = start.elapsed().as_millis(),
                "OpenAI structured output"
            );
        }

        first_payload(chat_response)
    }
}

/// Pull the payload out of the first choice.
fn first_payload(response: types::ChatResponseRaw) -> Result<String> {
    let message = response
        .choices
        .into_iter()
        .next()
        .map(|c| c.message)
        .ok_or_else(|| OpenAIError::EmptyResponse("no choices in response".into()))?;

    if let Some(refusal) = message.refusal {
        return Err(OpenAIError::Refusal(refusal));
    }

    match message.content {
        Some(content) if !content.trim().is_empty() => Ok(content),
        Some(_) => Err(OpenAIError::EmptyResponse("content is blank".into())),
        None => Err(OpenAIError::EmptyResponse("content is null".into())),
    }
}

/// Deserialize a structured payload. JSON `null` counts as an absent payload.
fn parse_payload<T: StructuredOutput>(json_str: &str) -> Result<T> {
    let value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| OpenAIError::Parse(format!("Response is not JSON: {}", e)))?;

    if value.is_null() {
        return Err(OpenAIError::EmptyResponse("parsed payload is null".into()));
    }

    serde_json::from_value(value)
        .map_err(|e| OpenAIError::Parse(format!("Failed to deserialize response: {}", e)))
}
