//! Sentiment distribution per category over an enriched table.

pub mod breakdown;
pub mod error;
pub mod extremes;

pub use breakdown::{breakdown, BreakdownRow, SentimentBreakdown, SentinelPolicy};
pub use error::AnalyticsError;
pub use extremes::{extremes, Extreme, Extremes};
