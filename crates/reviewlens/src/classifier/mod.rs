//! Sentiment classification through an external text-generation service.
//!
//! [`ClassificationClient`] is the only place in the crate that retries: each
//! text gets up to `max_attempts` calls, every reply goes through
//! [`response::validate_reply`], and failed attempts back off exponentially
//! before the next call.

pub mod client;
pub mod response;
pub mod service;

pub use client::{
    AttemptFailure, Classification, ClassificationClient, Classify, FailureReason, RetryPolicy,
    Sleeper, ThreadSleeper, EMPTY_TEXT_SUMMARY, EXHAUSTED_SUMMARY, SYSTEM_PROMPT,
};
pub use response::{parse, validate_reply, ClassificationResult, ReplyError};
pub use service::{ChatCompletionsService, CompletionService, ServiceError};
