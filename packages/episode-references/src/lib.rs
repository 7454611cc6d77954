//! Podcast Show-Notes Reference Extraction
//!
//! Turns crawled podcast episode records into a catalogue of the
//! bibliographic references mentioned in each episode's show notes.
//!
//! # Stages
//!
//! 1. A crawl (outside this crate) stores episode metadata as a batch in
//!    an append-only dataset ([`DatasetStore::push_batch`]).
//! 2. The [`Pipeline`] loads the latest batch, asks a structured
//!    extraction service for each description's references, and isolates
//!    per-record failures.
//! 3. The complete, ordered result collection is written once.
//!
//! # Usage
//!
//! ```rust,ignore
//! use episode_references::{DatasetStore, JsonFileWriter, Pipeline};
//! use episode_references::ai::OpenAIExtractor;
//!
//! let pipeline = Pipeline::new(
//!     DatasetStore::new("./storage/datasets/episodes"),
//!     OpenAIExtractor::from_env()?,
//!     JsonFileWriter::new("references.json"),
//! );
//! let report = pipeline.run().await?;
//! println!("{} references, {} failures", report.reference_count(), report.failure_count());
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Seams: episode store, reference extractor, result writer
//! - [`types`] - Episode records, reference schema, results
//! - [`pipeline`] - The extraction orchestrator, prompts and validation
//! - [`stores`] - Dataset directory and in-memory stores
//! - [`writers`] - JSON file and in-memory writers
//! - [`testing`] - Mock implementations for testing

pub mod config;
pub mod error;
pub mod pipeline;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;
pub mod writers;

#[cfg(feature = "openai")]
pub mod ai;

// Re-export core types at crate root
pub use config::Config;
pub use error::{ExtractionFailure, PipelineError, StoreError};
pub use pipeline::{validate_references, Pipeline, Validation};
pub use traits::{extractor::ReferenceExtractor, store::EpisodeStore, writer::ResultWriter};
pub use types::{
    config::PipelineConfig,
    episode::{format_publish_date, Batch, BatchDocument, BatchId, EpisodeRecord},
    reference::{Reference, ReferenceList},
    result::{Diagnostic, EpisodeResult, RunReport},
};

// Re-export implementations
pub use stores::{DatasetStore, MemoryStore};
pub use testing::{FailingWriter, MockExtractor};
pub use writers::{read_results, JsonFileWriter, MemoryWriter};
