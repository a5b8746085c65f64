//! Tabular dataset handling: loading, staging and persisting tables.

pub mod staging;
pub mod store;
pub mod table;

pub use staging::stage;
pub use store::{load_csv, CsvTableStore, TableStore};
pub use table::{Record, Table};

/// Table names used for each persisted stage of a run.
pub const RAW_TABLE: &str = "raw_data";
pub const STAGING_TABLE: &str = "staging";
pub const PROCESSED_TABLE: &str = "processed";
