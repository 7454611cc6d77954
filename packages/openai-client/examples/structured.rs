//! Structured output example: pull citations out of a paragraph

use openai_client::{OpenAIClient, StructuredOutput};
use schemars::JsonSchema;
use serde::Deserialize;

#[derive(Debug, Deserialize, JsonSchema)]
struct Citation {
    /// Title of the cited work
    title: String,
    /// Author or institution
    author: String,
    /// Link, when the citation points at one
    url: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct Citations {
    citations: Vec<Citation>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = OpenAIClient::from_env()?;

    println!(
        "Schema:\n{}",
        serde_json::to_string_pretty(&Citations::openai_schema())?
    );

    let text = "Today we discuss Kahneman's Thinking, Fast and Slow and the \
                replication notes at https://replicationindex.com.";

    let found: Citations = client
        .extract::<Citations>(
            "gpt-4o-mini",
            "List every work cited in the user's text.",
            text,
        )
        .await?;

    for citation in found.citations {
        println!(
            "  {} by {} ({})",
            citation.title,
            citation.author,
            citation.url.as_deref().unwrap_or("no link")
        );
    }

    Ok(())
}
