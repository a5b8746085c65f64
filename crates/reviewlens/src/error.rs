use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReviewLensError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Enrichment error: {0}")]
    Pipeline(#[from] crate::pipeline::PipelineError),

    #[error("Analytics error: {0}")]
    Analytics(#[from] crate::analytics::AnalyticsError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    #[error("Secret error: {0}")]
    Secret(#[from] crate::secrets::SecretError),

    #[error("Classification service setup failed: {0}")]
    Service(#[from] crate::classifier::ServiceError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Failed to parse config YAML: {0}")]
    ParseYaml(#[from] serde_yaml::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Invalid value '{value}' for environment variable '{name}': {reason}")]
    InvalidEnv {
        name: String,
        value: String,
        reason: String,
    },
}

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to read dataset '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to write table '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to protect '{path}': {source}")]
    Protect {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Dataset has no header row")]
    MissingHeader,

    #[error("Column '{0}' not found in dataset")]
    MissingColumn(String),

    #[error("Column '{column}' has {actual} values, expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        actual: usize,
    },
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to create report directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write report '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReviewLensError>;
