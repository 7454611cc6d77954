pub mod extractor;
pub mod store;
pub mod writer;
