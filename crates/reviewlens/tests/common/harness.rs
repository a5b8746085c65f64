//! Test harness for isolated pipeline runs.
//!
//! The `TestHarness` owns a temporary directory with a `data/` folder for
//! input CSV files and an `output/` folder for tables and charts, and wires
//! the enricher to an injected completion service with no real sleeping.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use reviewlens::classifier::{ClassificationClient, CompletionService, RetryPolicy};
use reviewlens::config::Config;
use reviewlens::pipeline::{BatchEnricher, EnrichConfig, NoopProgress};
use reviewlens::{run_with, CsvTableStore, RunSummary, TextChartWriter};

use super::builders::{ConfigBuilder, RecordingSleeper};

pub struct TestHarness {
    temp_dir: TempDir,
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub sleeper: RecordingSleeper,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let data_dir = temp_dir.path().join("data");
        let output_dir = temp_dir.path().join("output");
        std::fs::create_dir_all(&data_dir).expect("Failed to create data directory");

        Self {
            temp_dir,
            data_dir,
            output_dir,
            sleeper: RecordingSleeper::new(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Config builder preset to write into this harness's output directory.
    pub fn config(&self) -> ConfigBuilder {
        ConfigBuilder::new().output_directory(self.output_dir.to_str().expect("utf-8 temp path"))
    }

    pub fn write_dataset(&self, name: &str, csv: &str) -> PathBuf {
        let path = self.data_dir.join(name);
        std::fs::write(&path, csv).expect("Failed to write dataset");
        path
    }

    pub fn enricher<S>(&self, config: &Config, service: S) -> BatchEnricher
    where
        S: CompletionService + 'static,
    {
        let policy = RetryPolicy {
            max_attempts: config.retry.max_attempts,
            backoff_base_secs: config.retry.backoff_base_secs,
        };
        let client = ClassificationClient::with_sleeper(
            Box::new(service),
            Box::new(self.sleeper.clone()),
            policy,
        );
        BatchEnricher::new(EnrichConfig::from_config(config), Box::new(client))
    }

    /// Runs the full pipeline on `dataset` with CSV tables and a text chart
    /// under the configured output directory.
    pub fn run<S>(
        &self,
        dataset: &Path,
        config: &Config,
        service: S,
    ) -> reviewlens::Result<RunSummary>
    where
        S: CompletionService + 'static,
    {
        let enricher = self.enricher(config, service);
        let store = CsvTableStore::new(&config.output.directory);
        let sink = TextChartWriter::new(&config.output.directory);
        run_with(dataset, config, &enricher, &store, &sink, &NoopProgress)
    }

    pub fn read_output(&self, file: &str) -> String {
        std::fs::read_to_string(self.output_dir.join(file)).expect("Failed to read output file")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
