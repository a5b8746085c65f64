pub mod analytics;
pub mod app;
pub mod classifier;
pub mod config;
pub mod dataset;
pub mod error;
pub mod normalizer;
pub mod pipeline;
pub mod report;
pub mod sanitize;
pub mod secrets;
pub mod sentiment;

pub use analytics::{breakdown, extremes, Extremes, SentimentBreakdown, SentinelPolicy};
pub use app::{run_pipeline, run_with, RunSummary};
pub use classifier::{ClassificationClient, Classify, CompletionService};
pub use config::{load_config, load_effective_config, Config};
pub use dataset::{CsvTableStore, Table, TableStore};
pub use error::{ConfigError, DatasetError, ReportError, Result, ReviewLensError};
pub use normalizer::normalize;
pub use pipeline::{BatchEnricher, EnrichConfig, EnrichedTable, PipelineError};
pub use report::{ChartSink, TextChartWriter};
pub use secrets::{resolve_secret, SecretError};
pub use sentiment::Sentiment;
