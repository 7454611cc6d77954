//! Output writer implementations.

pub mod json;
pub mod memory;

pub use json::{read_results, JsonFileWriter};
pub use memory::MemoryWriter;
