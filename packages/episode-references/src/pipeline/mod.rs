//! Extraction pipeline - the core of the library.
//!
//! The pipeline orchestrates:
//! - Loading the latest (or a named) episode batch
//! - One structured extraction call per record
//! - Boundary validation of each payload
//! - Per-record failure isolation
//! - A single all-or-nothing write of the results

pub mod prompts;
pub mod run;
pub mod validate;

pub use prompts::{format_reference_prompt, REFERENCE_PROMPT, REFERENCE_SYSTEM_PROMPT};
pub use run::Pipeline;
pub use validate::{validate_references, Validation};
