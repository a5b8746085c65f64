use std::time::Instant;

use secrecy::SecretString;
use tracing::{debug, info_span};

use crate::classifier::{
    ChatCompletionsService, ClassificationClient, Classify, RetryPolicy, ServiceError,
};
use crate::config::Config;
use crate::dataset::Table;
use crate::normalizer;
use crate::sentiment::Sentiment;

use super::batch::batch_ranges;
use super::config::EnrichConfig;
use super::context::{EnrichedTable, PipelineContext};
use super::error::PipelineError;
use super::progress::{ProgressEvent, ProgressReporter};

pub const SENTIMENT_COLUMN: &str = "sentiment";
pub const SUMMARY_COLUMN: &str = "summary";
pub const ACTION_COLUMN: &str = "action_needed";

pub const ACTION_YES: &str = "Yes";
pub const ACTION_NO: &str = "No";

/// `"Yes"` exactly when the label is `negative`, ignoring case and
/// surrounding whitespace. Sentinels never require action.
pub fn derive_action(sentiment: &str) -> &'static str {
    if Sentiment::parse(sentiment).requires_action() {
        ACTION_YES
    } else {
        ACTION_NO
    }
}

/// Assigns the `action_needed` column from the `sentiment` column.
pub fn flag_actions(table: &mut Table) -> Result<(), PipelineError> {
    let actions: Vec<String> = table
        .column(SENTIMENT_COLUMN)
        .map_err(|_| PipelineError::MissingColumn {
            column: SENTIMENT_COLUMN.to_string(),
            stage: "flag_actions",
        })?
        .into_iter()
        .map(|s| derive_action(s).to_string())
        .collect();
    table.set_column(ACTION_COLUMN, actions)?;
    Ok(())
}

pub struct BatchEnricher {
    config: EnrichConfig,
    classifier: Box<dyn Classify>,
}

impl BatchEnricher {
    /// Production constructor: classifies through the configured chat
    /// completions endpoint with the configured retry policy.
    pub fn from_config(config: &Config, api_key: SecretString) -> Result<Self, ServiceError> {
        let service = ChatCompletionsService::new(&config.service, api_key)?;
        let policy = RetryPolicy {
            max_attempts: config.retry.max_attempts,
            backoff_base_secs: config.retry.backoff_base_secs,
        };
        let client = ClassificationClient::new(Box::new(service), policy);
        Ok(Self::new(EnrichConfig::from_config(config), Box::new(client)))
    }

    pub fn new(config: EnrichConfig, classifier: Box<dyn Classify>) -> Self {
        Self { config, classifier }
    }

    /// Classifies every row of `table` in order and returns a copy with the
    /// enrichment columns assigned.
    ///
    /// Only structural problems fail the run. A row whose classification
    /// fails carries the `error` sentinel instead.
    pub fn enrich(
        &self,
        table: &Table,
        progress: &dyn ProgressReporter,
    ) -> Result<EnrichedTable, PipelineError> {
        let _enrich_span = info_span!("enrich",
            rows = table.len(),
            batch_size = self.config.batch_size,
        )
        .entered();

        let mut ctx = PipelineContext::new(table.clone());

        {
            let _step = info_span!("validate_columns").entered();
            self.step_validate_columns(&mut ctx)?;
        }

        {
            let _step = info_span!("classify_batches").entered();
            self.step_classify_batches(&mut ctx, progress);
        }

        {
            let _step = info_span!("attach_columns").entered();
            self.step_attach_columns(&mut ctx)?;
        }

        {
            let _step = info_span!("flag_actions").entered();
            flag_actions(&mut ctx.table)?;
        }

        progress.report(ProgressEvent::Completed {
            records: ctx.stats.records,
            batches: ctx.stats.batches,
            errors: ctx.stats.errors,
        });

        Ok(ctx.into_enriched())
    }

    fn step_validate_columns(&self, ctx: &mut PipelineContext) -> Result<(), PipelineError> {
        if self.config.batch_size == 0 {
            return Err(PipelineError::InvalidBatchSize);
        }

        let text_index = ctx.table.column_index(&self.config.text_column).ok_or_else(|| {
            PipelineError::MissingColumn {
                column: self.config.text_column.clone(),
                stage: "validate_columns",
            }
        })?;
        if !ctx.table.has_column(&self.config.category_column) {
            return Err(PipelineError::MissingColumn {
                column: self.config.category_column.clone(),
                stage: "validate_columns",
            });
        }

        ctx.text_index = Some(text_index);
        ctx.batches = batch_ranges(ctx.table.len(), self.config.batch_size);
        Ok(())
    }

    fn step_classify_batches(&self, ctx: &mut PipelineContext, progress: &dyn ProgressReporter) {
        let total_batches = ctx.batches.len();

        for (number, range) in ctx.batches.iter().enumerate() {
            let batch = number + 1;
            let _batch_span = info_span!("batch", batch, size = range.len()).entered();
            let started = Instant::now();
            let errors_before = ctx.stats.errors;

            progress.report(ProgressEvent::BatchStarted {
                batch,
                total_batches,
                size: range.len(),
            });

            for index in range.clone() {
                let cell = ctx
                    .text_index
                    .and_then(|i| ctx.table.rows().get(index).and_then(|row| row.get(i)))
                    .map(String::as_str);
                let text = normalizer::normalize_cell(cell);
                let classification = self.classifier.classify(&text);

                ctx.stats.record(&classification);
                progress.report(ProgressEvent::RecordClassified {
                    index,
                    sentiment: classification.sentiment.to_string(),
                    attempts: classification.attempts,
                });
                ctx.classifications.push(classification);
            }

            ctx.stats.batches += 1;
            debug!(
                batch,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "batch finished"
            );
            progress.report(ProgressEvent::BatchCompleted {
                batch,
                errors: ctx.stats.errors - errors_before,
            });
        }
    }

    fn step_attach_columns(&self, ctx: &mut PipelineContext) -> Result<(), PipelineError> {
        let (sentiments, summaries): (Vec<String>, Vec<String>) = ctx
            .classifications
            .iter()
            .map(|c| {
                let (sentiment, summary) = c.pair();
                (sentiment.to_string(), summary.to_string())
            })
            .unzip();

        ctx.table.set_column(SENTIMENT_COLUMN, sentiments)?;
        ctx.table.set_column(SUMMARY_COLUMN, summaries)?;
        Ok(())
    }
}
