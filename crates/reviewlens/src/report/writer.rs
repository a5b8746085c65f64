use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use log::info;
use serde::Serialize;

use crate::analytics::{BreakdownRow, Extremes, SentimentBreakdown};
use crate::error::ReportError;

use super::chart::render_chart;
use super::{ChartSink, ReportPaths};

const FILE_STEM: &str = "sentiment_breakdown";

/// JSON companion to the rendered chart.
#[derive(Debug, Serialize)]
pub struct SentimentReport<'a> {
    pub generated_at: String,
    pub category_column: &'a str,
    pub breakdown: &'a [BreakdownRow],
    pub extremes: &'a Extremes,
}

/// Writes `sentiment_breakdown_<YYYYmmdd_HHMMSS>.txt` and a `.json` report
/// with the same stem into the output directory.
pub struct TextChartWriter {
    output_directory: PathBuf,
}

impl TextChartWriter {
    pub fn new<P: AsRef<Path>>(output_directory: P) -> Self {
        Self {
            output_directory: output_directory.as_ref().to_path_buf(),
        }
    }

    /// Renders with an explicit timestamp instead of the current time.
    pub fn render_at(
        &self,
        breakdown: &SentimentBreakdown,
        extremes: &Extremes,
        timestamp: DateTime<Local>,
    ) -> Result<ReportPaths, ReportError> {
        std::fs::create_dir_all(&self.output_directory).map_err(|e| {
            ReportError::CreateDirectory {
                path: self.output_directory.clone(),
                source: e,
            }
        })?;

        let stem = format!("{}_{}", FILE_STEM, timestamp.format("%Y%m%d_%H%M%S"));
        let chart_path = self.output_directory.join(format!("{}.txt", stem));
        let report_path = self.output_directory.join(format!("{}.json", stem));

        write_file(&chart_path, render_chart(breakdown).as_bytes())?;

        let report = SentimentReport {
            generated_at: timestamp.to_rfc3339(),
            category_column: &breakdown.category_column,
            breakdown: &breakdown.rows,
            extremes,
        };
        let json = serde_json::to_string_pretty(&report)?;
        write_file(&report_path, json.as_bytes())?;

        info!("Chart saved to {}", chart_path.display());
        Ok(ReportPaths {
            chart: chart_path,
            report: report_path,
        })
    }
}

impl ChartSink for TextChartWriter {
    fn render(
        &self,
        breakdown: &SentimentBreakdown,
        extremes: &Extremes,
    ) -> Result<ReportPaths, ReportError> {
        self.render_at(breakdown, extremes, Local::now())
    }
}

fn write_file(path: &Path, content: &[u8]) -> Result<(), ReportError> {
    std::fs::write(path, content).map_err(|e| ReportError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })
}
