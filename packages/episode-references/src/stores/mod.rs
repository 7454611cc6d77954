//! Episode store implementations.
//!
//! Available backends:
//! - `DatasetStore` - directory of JSON batch documents (crawl output)
//! - `MemoryStore` - in-memory batches for tests and embedding

pub mod dataset;
pub mod memory;

pub use dataset::DatasetStore;
pub use memory::MemoryStore;
