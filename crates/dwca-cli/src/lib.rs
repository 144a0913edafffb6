//! CLI library components for the Darwin Core Archive extractor.

pub mod logging;
pub mod pipeline;
pub mod types;
