//! The four-stage ingestion pipeline: source dispatch, feed parsing and
//! filtering, article fetch-and-extract, embedding-and-persist. Stages are
//! connected by bounded queues and are individually idempotent, so every
//! message can safely be delivered more than once.

pub mod config;
pub mod extract;
pub mod feed;
pub mod fetch;
pub mod filter;
pub mod pipeline;
pub mod retry;
pub mod sources;

pub use config::PipelineConfig;
pub use pipeline::{Pipeline, RunSummary};
