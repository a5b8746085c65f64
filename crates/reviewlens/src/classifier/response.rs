//! Structural validation of classification replies.
//!
//! A reply is valid only when it is a single JSON object holding exactly the
//! string fields `sentiment` and `summary`, and the sentiment is not one of
//! the labels reserved for records the client could not classify. Anything
//! else is rejected with a [`ReplyError`] describing why.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::sentiment::Sentiment;

/// A validated classification reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationResult {
    pub sentiment: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplyError {
    #[error("reply was empty")]
    Empty,

    #[error("reply is not valid JSON: {0}")]
    Malformed(String),

    #[error("reply is not a JSON object")]
    NotAnObject,

    #[error("reply is missing field '{0}'")]
    MissingField(&'static str),

    #[error("reply has unexpected field '{0}'")]
    UnexpectedField(String),

    #[error("field '{0}' is not a string")]
    WrongType(&'static str),

    #[error("field '{0}' is blank")]
    BlankField(&'static str),

    #[error("reply used reserved sentiment label '{0}'")]
    ReservedLabel(String),
}

const SENTIMENT_FIELD: &str = "sentiment";
const SUMMARY_FIELD: &str = "summary";

/// Validates a raw reply, reporting the first structural problem found.
pub fn validate_reply(raw: &str) -> Result<ClassificationResult, ReplyError> {
    let body = strip_code_fence(raw);
    if body.is_empty() {
        return Err(ReplyError::Empty);
    }

    let value: Value =
        serde_json::from_str(body).map_err(|e| ReplyError::Malformed(e.to_string()))?;
    let Value::Object(object) = value else {
        return Err(ReplyError::NotAnObject);
    };

    if let Some(extra) = object
        .keys()
        .find(|key| key.as_str() != SENTIMENT_FIELD && key.as_str() != SUMMARY_FIELD)
    {
        return Err(ReplyError::UnexpectedField(extra.clone()));
    }

    let sentiment = required_string(&object, SENTIMENT_FIELD)?;
    if Sentiment::parse(&sentiment).is_sentinel() {
        return Err(ReplyError::ReservedLabel(sentiment));
    }

    Ok(ClassificationResult {
        sentiment,
        summary: required_string(&object, SUMMARY_FIELD)?,
    })
}

/// Returns the validated reply, or `None` for any invalid reply.
pub fn parse(raw: &str) -> Option<ClassificationResult> {
    validate_reply(raw).ok()
}

fn required_string(object: &Map<String, Value>, field: &'static str) -> Result<String, ReplyError> {
    match object.get(field) {
        None => Err(ReplyError::MissingField(field)),
        Some(Value::String(s)) if s.trim().is_empty() => Err(ReplyError::BlankField(field)),
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(_) => Err(ReplyError::WrongType(field)),
    }
}

/// Unwraps a reply enclosed in a Markdown code fence (with or without a
/// language tag). Other text is returned trimmed.
fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(inner) = rest.strip_suffix("```") else {
        return text;
    };
    // Skip a language identifier such as `json` on the opening line.
    let inner = match inner.find('\n') {
        Some(newline) if !inner[..newline].trim().starts_with('{') => &inner[newline + 1..],
        _ => inner,
    };
    inner.trim()
}
