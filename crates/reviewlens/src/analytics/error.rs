use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("Column '{column}' is missing from the enriched table")]
    MissingColumn { column: String },
}
