//! Batched enrichment of a staged review table.

pub mod batch;
pub mod config;
pub mod context;
pub mod error;
pub mod progress;
pub mod runner;

pub use batch::batch_ranges;
pub use config::EnrichConfig;
pub use context::{EnrichedTable, EnrichmentStats, PipelineContext};
pub use error::PipelineError;
pub use progress::{LogProgress, NoopProgress, ProgressEvent, ProgressReporter};
pub use runner::{
    derive_action, flag_actions, BatchEnricher, ACTION_COLUMN, ACTION_NO, ACTION_YES,
    SENTIMENT_COLUMN, SUMMARY_COLUMN,
};
