//! Batch processing of roster documents.

mod orchestrator;
mod report;

pub use orchestrator::{BatchOptions, BatchOutcome, BatchRunner};
pub use report::{BatchReport, SkippedDocument};
