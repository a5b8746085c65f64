//! End-to-end run: load, stage, enrich, persist, analyse, chart.

use std::path::{Path, PathBuf};

use log::info;
use tracing::info_span;
use uuid::Uuid;

use crate::analytics::{breakdown, extremes, Extremes, SentimentBreakdown, SentinelPolicy};
use crate::config::Config;
use crate::dataset::{
    load_csv, stage, CsvTableStore, TableStore, PROCESSED_TABLE, RAW_TABLE, STAGING_TABLE,
};
use crate::error::Result;
use crate::pipeline::{BatchEnricher, EnrichmentStats, LogProgress, ProgressReporter};
use crate::report::{ChartSink, ReportPaths, TextChartWriter};
use crate::sanitize;
use crate::secrets::resolve_secret;

/// What a completed run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub stats: EnrichmentStats,
    pub processed_path: PathBuf,
    pub breakdown: SentimentBreakdown,
    pub extremes: Extremes,
    pub report: ReportPaths,
}

/// Runs the pipeline against `dataset` with production collaborators: the
/// configured chat completions service, CSV tables and a text chart, all
/// under `config.output.directory`.
pub fn run_pipeline(dataset: &Path, config: &Config) -> Result<RunSummary> {
    let service = &config.service;
    let api_key = resolve_secret(
        service.api_key.as_deref(),
        service.api_key_file.as_deref(),
        service.api_key_env_var.as_deref(),
    )?;

    let enricher = BatchEnricher::from_config(config, api_key)?;
    let store = CsvTableStore::new(&config.output.directory);
    let sink = TextChartWriter::new(&config.output.directory);

    run_with(dataset, config, &enricher, &store, &sink, &LogProgress)
}

/// Runs the pipeline with injected collaborators.
pub fn run_with(
    dataset: &Path,
    config: &Config,
    enricher: &BatchEnricher,
    store: &dyn TableStore,
    sink: &dyn ChartSink,
    progress: &dyn ProgressReporter,
) -> Result<RunSummary> {
    let run_id = Uuid::new_v4();
    let _run_span = info_span!("run",
        run_id = %run_id,
        dataset = %sanitize::redact_path(dataset),
    )
    .entered();

    let raw = {
        let _step = info_span!("load").entered();
        let raw = load_csv(dataset, config.dataset.row_limit)?;
        store.write(RAW_TABLE, &raw)?;
        raw
    };

    let staged = {
        let _step = info_span!("stage").entered();
        let staged = stage(&raw);
        store.write(STAGING_TABLE, &staged)?;
        staged
    };

    let enriched = enricher.enrich(&staged, progress)?;

    let processed_path = {
        let _step = info_span!("persist").entered();
        let path = store.write(PROCESSED_TABLE, &enriched.table)?;
        if config.output.protect {
            store.protect(PROCESSED_TABLE)?;
        }
        path
    };

    let (breakdown, extremes) = {
        let _step = info_span!("analyse").entered();
        let policy = SentinelPolicy::from_config(&config.analytics);
        let breakdown = breakdown(&enriched.table, &config.dataset.category_column, policy)?;
        let extremes = extremes(&breakdown);
        for (label, extreme) in extremes.iter() {
            info!(
                "Highest {} share: {} ({:.1}%)",
                label, extreme.category, extreme.percentage
            );
        }
        (breakdown, extremes)
    };

    let report = sink.render(&breakdown, &extremes)?;

    info!(
        "Run {} finished: {} records, {} errors, {} without text",
        run_id, enriched.stats.records, enriched.stats.errors, enriched.stats.empty
    );

    Ok(RunSummary {
        run_id,
        stats: enriched.stats,
        processed_path,
        breakdown,
        extremes,
        report,
    })
}
