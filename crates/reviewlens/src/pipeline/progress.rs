use log::{debug, info};

/// Events emitted by the enricher while it works through the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    BatchStarted {
        /// 1-based batch number.
        batch: usize,
        total_batches: usize,
        size: usize,
    },
    RecordClassified {
        /// 0-based row index.
        index: usize,
        sentiment: String,
        attempts: u32,
    },
    BatchCompleted {
        batch: usize,
        errors: usize,
    },
    Completed {
        records: usize,
        batches: usize,
        errors: usize,
    },
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// No-op reporter for unit tests.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Writes progress to the log; batch boundaries at info, records at debug.
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::BatchStarted {
                batch,
                total_batches,
                size,
            } => {
                info!("Processing batch {}/{} ({} records)", batch, total_batches, size);
            }
            ProgressEvent::RecordClassified {
                index,
                sentiment,
                attempts,
            } => {
                debug!("Row {} classified as {} after {} attempt(s)", index, sentiment, attempts);
            }
            ProgressEvent::BatchCompleted { batch, errors } => {
                info!("Batch {} complete ({} errors)", batch, errors);
            }
            ProgressEvent::Completed {
                records,
                batches,
                errors,
            } => {
                info!(
                    "Enrichment complete: {} records in {} batches, {} errors",
                    records, batches, errors
                );
            }
        }
    }
}
