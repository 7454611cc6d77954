pub mod config;
pub mod episode;
pub mod reference;
pub mod result;
