//! AI extractor implementations.
//!
//! - `OpenAIExtractor` - OpenAI structured outputs (requires `openai` feature)

pub mod openai;

pub use openai::OpenAIExtractor;
