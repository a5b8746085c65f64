use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::sentiment::{Sentiment, PRIMARY_SENTIMENTS};

use super::breakdown::SentimentBreakdown;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extreme {
    pub category: String,
    pub percentage: f64,
}

/// Category with the highest share for each primary sentiment label.
/// Labels that never occur are absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Extremes {
    by_label: BTreeMap<String, Extreme>,
}

impl Extremes {
    pub fn get(&self, sentiment: &Sentiment) -> Option<&Extreme> {
        self.by_label.get(sentiment.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Extreme)> {
        self.by_label.iter().map(|(label, e)| (label.as_str(), e))
    }

    pub fn len(&self) -> usize {
        self.by_label.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_label.is_empty()
    }
}

/// Picks, for `positive`, `negative` and `neutral`, the category where that
/// label has its highest percentage. On a tie the category that sorts first
/// wins.
pub fn extremes(breakdown: &SentimentBreakdown) -> Extremes {
    let mut by_label = BTreeMap::new();

    for sentiment in PRIMARY_SENTIMENTS.iter() {
        let mut best: Option<Extreme> = None;
        for row in breakdown.rows.iter().filter(|r| r.sentiment == sentiment.as_str()) {
            if best.as_ref().map_or(true, |b| row.percentage > b.percentage) {
                best = Some(Extreme {
                    category: row.category.clone(),
                    percentage: row.percentage,
                });
            }
        }
        if let Some(extreme) = best {
            by_label.insert(sentiment.as_str().to_string(), extreme);
        }
    }

    Extremes { by_label }
}
