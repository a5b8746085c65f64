use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::schema::AnalyticsConfig;
use crate::dataset::Table;
use crate::pipeline::SENTIMENT_COLUMN;
use crate::sentiment::Sentiment;

use super::error::AnalyticsError;

/// Whether `error` and `none` rows count towards category totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentinelPolicy {
    #[default]
    Include,
    Exclude,
}

impl SentinelPolicy {
    pub fn from_config(config: &AnalyticsConfig) -> Self {
        if config.include_sentinels {
            SentinelPolicy::Include
        } else {
            SentinelPolicy::Exclude
        }
    }

    fn admits(&self, sentiment: &Sentiment) -> bool {
        match self {
            SentinelPolicy::Include => true,
            SentinelPolicy::Exclude => !sentiment.is_sentinel(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownRow {
    pub category: String,
    pub sentiment: String,
    pub count: usize,
    /// Share of the category's rows, 0 to 100.
    pub percentage: f64,
}

/// Percentage of each sentiment within each category, ordered by
/// `(category, sentiment)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentBreakdown {
    pub category_column: String,
    pub rows: Vec<BreakdownRow>,
}

impl SentimentBreakdown {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct categories in order.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for row in &self.rows {
            if categories.last() != Some(&row.category.as_str()) {
                categories.push(&row.category);
            }
        }
        categories
    }

    pub fn rows_for<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a BreakdownRow> {
        self.rows.iter().filter(move |r| r.category == category)
    }

    pub fn percentage(&self, category: &str, sentiment: &str) -> Option<f64> {
        self.rows_for(category)
            .find(|r| r.sentiment == sentiment)
            .map(|r| r.percentage)
    }
}

/// Groups the enriched table by `(category, sentiment)` and computes each
/// group's share of its category.
///
/// Sentiment cells are grouped by their trimmed lowercase label.
pub fn breakdown(
    table: &Table,
    category_column: &str,
    policy: SentinelPolicy,
) -> Result<SentimentBreakdown, AnalyticsError> {
    let sentiments = table
        .column(SENTIMENT_COLUMN)
        .map_err(|_| missing(SENTIMENT_COLUMN))?;
    let categories = table
        .column(category_column)
        .map_err(|_| missing(category_column))?;

    let mut counts: BTreeMap<(&str, String), usize> = BTreeMap::new();
    let mut totals: BTreeMap<&str, usize> = BTreeMap::new();

    for (category, cell) in categories.into_iter().zip(sentiments) {
        if !policy.admits(&Sentiment::parse(cell)) {
            continue;
        }
        *counts.entry((category, cell.trim().to_lowercase())).or_default() += 1;
        *totals.entry(category).or_default() += 1;
    }

    let rows: Vec<BreakdownRow> = counts
        .into_iter()
        .map(|((category, sentiment), count)| {
            let total = totals.get(category).copied().unwrap_or(count);
            BreakdownRow {
                category: category.to_string(),
                sentiment,
                count,
                percentage: 100.0 * count as f64 / total as f64,
            }
        })
        .collect();

    debug!(
        "Sentiment breakdown: {} categories, {} groups",
        totals.len(),
        rows.len()
    );

    Ok(SentimentBreakdown {
        category_column: category_column.to_string(),
        rows,
    })
}

fn missing(column: &str) -> AnalyticsError {
    AnalyticsError::MissingColumn {
        column: column.to_string(),
    }
}
