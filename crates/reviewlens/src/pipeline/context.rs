use std::ops::Range;

use crate::classifier::Classification;
use crate::dataset::Table;
use crate::sentiment::Sentiment;

/// Counters collected over one enrichment run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichmentStats {
    pub records: usize,
    pub batches: usize,
    /// Records that ended with the `error` sentinel.
    pub errors: usize,
    /// Records with no text to classify.
    pub empty: usize,
}

impl EnrichmentStats {
    pub(crate) fn record(&mut self, classification: &Classification) {
        self.records += 1;
        match classification.sentiment {
            Sentiment::Error => self.errors += 1,
            Sentiment::None => self.empty += 1,
            _ => {}
        }
    }
}

/// The input table with `sentiment`, `summary` and `action_needed` assigned.
#[derive(Debug, Clone)]
pub struct EnrichedTable {
    pub table: Table,
    pub stats: EnrichmentStats,
}

pub struct PipelineContext {
    // Input, enriched in place by the attach and flag steps
    pub table: Table,

    // Set by validate_columns
    pub text_index: Option<usize>,

    // Batch boundaries in row order
    pub batches: Vec<Range<usize>>,

    // One entry per row, in row order, after classify_batches
    pub classifications: Vec<Classification>,

    pub stats: EnrichmentStats,
}

impl PipelineContext {
    pub fn new(table: Table) -> Self {
        Self {
            table,
            text_index: None,
            batches: Vec::new(),
            classifications: Vec::new(),
            stats: EnrichmentStats::default(),
        }
    }

    pub fn into_enriched(self) -> EnrichedTable {
        EnrichedTable {
            table: self.table,
            stats: self.stats,
        }
    }
}
