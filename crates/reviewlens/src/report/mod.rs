//! Chart and JSON rendering of a sentiment breakdown.

pub mod chart;
pub mod writer;

use std::path::PathBuf;

use crate::analytics::{Extremes, SentimentBreakdown};
use crate::error::ReportError;

pub use chart::{render_chart, BAR_WIDTH};
pub use writer::{SentimentReport, TextChartWriter};

/// Files produced for one rendered breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub chart: PathBuf,
    pub report: PathBuf,
}

/// Consumer of the analytics output.
pub trait ChartSink {
    fn render(
        &self,
        breakdown: &SentimentBreakdown,
        extremes: &Extremes,
    ) -> Result<ReportPaths, ReportError>;
}
