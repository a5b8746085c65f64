use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Column '{column}' is missing (required by {stage})")]
    MissingColumn { column: String, stage: &'static str },

    #[error("Batch size must be at least 1")]
    InvalidBatchSize,

    #[error("Dataset error: {0}")]
    Dataset(#[from] crate::error::DatasetError),
}
