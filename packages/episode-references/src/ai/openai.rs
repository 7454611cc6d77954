//! OpenAI implementation of the [`ReferenceExtractor`] trait.
//!
//! One strict `json_schema` chat completion per call, schema generated
//! from [`ReferenceList`]. No retries: transient and permanent failures
//! both surface as [`ExtractionFailure`].
//!
//! # Example
//!
//! ```rust,ignore
//! use episode_references::ai::OpenAIExtractor;
//!
//! let extractor = OpenAIExtractor::from_env()?.with_model("gpt-4o-mini");
//! let found = extractor.extract_references(show_notes).await?;
//! ```

use async_trait::async_trait;
use openai_client::{OpenAIClient, OpenAIError};
use tracing::debug;

use crate::error::ExtractionFailure;
use crate::pipeline::prompts::{format_reference_prompt, REFERENCE_SYSTEM_PROMPT};
use crate::traits::extractor::ReferenceExtractor;
use crate::types::reference::ReferenceList;

/// Default chat model for reference extraction.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// OpenAI-backed reference extractor.
#[derive(Clone)]
pub struct OpenAIExtractor {
    client: OpenAIClient,
    model: String,
}

impl OpenAIExtractor {
    /// Wrap an existing client.
    pub fn new(client: OpenAIClient) -> Self {
        Self {
            client,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Create from environment variable `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self, OpenAIError> {
        Ok(Self::new(OpenAIClient::from_env()?))
    }

    /// Set the chat model (default: gpt-4o-mini).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Get the current model name.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ReferenceExtractor for OpenAIExtractor {
    async fn extract_references(&self, text: &str) -> Result<ReferenceList, ExtractionFailure> {
        let list = self
            .client
            .extract::<ReferenceList>(
                &self.model,
                REFERENCE_SYSTEM_PROMPT,
                format_reference_prompt(text),
            )
            .await?;

        debug!(model = %self.model, references = list.references.len(), "OpenAI extraction");
        Ok(list)
    }
}
