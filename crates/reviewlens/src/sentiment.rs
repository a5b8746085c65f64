use std::fmt;

use serde::{Deserialize, Serialize};

/// Sentiment label attached to an enriched record.
///
/// `Error` and `None` are sentinels: classification failed, or there was no
/// text to classify. Labels the service invents are kept verbatim as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    Error,
    None,
    Other(String),
}

/// Labels reported by the extremes analysis.
pub const PRIMARY_SENTIMENTS: [Sentiment; 3] =
    [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

impl Sentiment {
    /// Case-insensitive parse; surrounding whitespace is ignored.
    pub fn parse(label: &str) -> Self {
        let trimmed = label.trim();
        match trimmed.to_lowercase().as_str() {
            "positive" => Sentiment::Positive,
            "negative" => Sentiment::Negative,
            "neutral" => Sentiment::Neutral,
            "error" => Sentiment::Error,
            "none" => Sentiment::None,
            _ => Sentiment::Other(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
            Sentiment::Error => "error",
            Sentiment::None => "none",
            Sentiment::Other(label) => label,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        matches!(self, Sentiment::Error | Sentiment::None)
    }

    /// True only for negative sentiment.
    pub fn requires_action(&self) -> bool {
        matches!(self, Sentiment::Negative)
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Sentiment {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Sentiment {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Sentiment::parse(&label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Sentiment::parse("NEGATIVE"), Sentiment::Negative);
        assert_eq!(Sentiment::parse(" Positive "), Sentiment::Positive);
        assert_eq!(Sentiment::parse("neutral"), Sentiment::Neutral);
    }

    #[test]
    fn test_unknown_label_is_kept() {
        assert_eq!(Sentiment::parse("Mixed"), Sentiment::Other("Mixed".to_string()));
        assert_eq!(Sentiment::parse("Mixed").to_string(), "Mixed");
    }

    #[test]
    fn test_only_negative_requires_action() {
        let labels = ["positive", "Negative", "neutral", "error", "none", "mixed"];
        for label in labels {
            let sentiment = Sentiment::parse(label);
            assert_eq!(sentiment.requires_action(), label.eq_ignore_ascii_case("negative"));
        }
    }

    #[test]
    fn test_sentinels() {
        assert!(Sentiment::Error.is_sentinel());
        assert!(Sentiment::None.is_sentinel());
        assert!(!Sentiment::Neutral.is_sentinel());
    }

    #[test]
    fn test_serde_uses_lowercase_label() {
        let json = serde_json::to_string(&Sentiment::Negative).unwrap();
        assert_eq!(json, "\"negative\"");
        let back: Sentiment = serde_json::from_str("\"Neutral\"").unwrap();
        assert_eq!(back, Sentiment::Neutral);
    }
}
