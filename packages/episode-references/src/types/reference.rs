//! Reference schema: the structured shape the extraction service must emit.
//!
//! Field doc comments end up as `description`s in the generated JSON
//! schema, so they double as instructions to the model.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One bibliographic reference mentioned in an episode's show notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Reference {
    /// Title of the referenced work.
    pub title: String,

    /// Author of the work: a person or an institution.
    pub author: String,

    /// Publisher of the work. For online resources this is the domain
    /// name (for example "example.com"), not an organization name.
    pub publisher: String,

    /// Link to the work, only when the reference itself points to a
    /// retrievable resource. Null otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl Reference {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        publisher: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            publisher: publisher.into(),
            href: None,
        }
    }

    /// Set the link.
    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }
}

/// Structured payload of one extraction call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReferenceList {
    /// Every bibliographic reference found in the text, in order of
    /// appearance. Empty when the text cites nothing.
    pub references: Vec<Reference>,
}

impl ReferenceList {
    pub fn new(references: Vec<Reference>) -> Self {
        Self { references }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}
