use std::time::Duration;

use tracing::{debug, info_span, warn};

use crate::sanitize;
use crate::sentiment::Sentiment;

use super::response::{validate_reply, ReplyError};
use super::service::{CompletionService, ServiceError};

/// Summary returned when there was no text to classify.
pub const EMPTY_TEXT_SUMMARY: &str = "No content provided.";

/// Summary returned when every attempt failed.
pub const EXHAUSTED_SUMMARY: &str = "Model failed to return valid JSON.";

/// Instruction sent with every review.
pub const SYSTEM_PROMPT: &str = "You are a retail review analyst. Classify the sentiment of the \
customer review you are given as exactly one of: positive, negative, neutral. Then summarize the \
review in one short sentence. Respond with a single JSON object and nothing else, in the form \
{\"sentiment\": \"positive|negative|neutral\", \"summary\": \"<one sentence>\"}.";

/// Why a single classification attempt did not produce a result.
#[derive(Debug)]
pub enum FailureReason {
    Service(ServiceError),
    InvalidReply(ReplyError),
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::Service(e) => write!(f, "service error: {}", e),
            FailureReason::InvalidReply(e) => write!(f, "invalid reply: {}", e),
        }
    }
}

#[derive(Debug)]
pub struct AttemptFailure {
    /// 1-based attempt number.
    pub attempt: u32,
    pub reason: FailureReason,
}

/// Outcome of classifying one text.
#[derive(Debug)]
pub struct Classification {
    pub sentiment: Sentiment,
    pub summary: String,
    /// Number of service calls made.
    pub attempts: u32,
    pub failures: Vec<AttemptFailure>,
}

impl Classification {
    fn empty_text() -> Self {
        Self {
            sentiment: Sentiment::None,
            summary: EMPTY_TEXT_SUMMARY.to_string(),
            attempts: 0,
            failures: Vec::new(),
        }
    }

    /// The `(sentiment, summary)` pair written to the enriched record.
    pub fn pair(&self) -> (&str, &str) {
        (self.sentiment.as_str(), &self.summary)
    }

    pub fn is_error(&self) -> bool {
        self.sentiment == Sentiment::Error
    }
}

/// Anything that can turn a normalized text into a sentiment and summary.
pub trait Classify {
    fn classify(&self, text: &str) -> Classification;
}

/// Blocks the calling thread between retries.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_base_secs: u64,
}

impl RetryPolicy {
    /// Delay after failed attempt `attempt` (1-based): `base^attempt` seconds.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        Duration::from_secs(self.backoff_base_secs.saturating_pow(attempt))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_base_secs: 2,
        }
    }
}

/// Calls the classification service with validation, retry and backoff.
///
/// Failures never escape: exhausted retries produce the `error` sentinel.
pub struct ClassificationClient {
    service: Box<dyn CompletionService>,
    sleeper: Box<dyn Sleeper>,
    policy: RetryPolicy,
}

impl ClassificationClient {
    pub fn new(service: Box<dyn CompletionService>, policy: RetryPolicy) -> Self {
        Self::with_sleeper(service, Box::new(ThreadSleeper), policy)
    }

    pub fn with_sleeper(
        service: Box<dyn CompletionService>,
        sleeper: Box<dyn Sleeper>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            service,
            sleeper,
            policy,
        }
    }

    fn attempt(&self, text: &str) -> Result<(Sentiment, String), FailureReason> {
        let raw = self
            .service
            .complete(SYSTEM_PROMPT, text)
            .map_err(FailureReason::Service)?;
        let result = validate_reply(&raw).map_err(FailureReason::InvalidReply)?;
        Ok((Sentiment::parse(&result.sentiment), result.summary))
    }
}

impl Classify for ClassificationClient {
    fn classify(&self, text: &str) -> Classification {
        if text.trim().is_empty() {
            return Classification::empty_text();
        }

        let _span = info_span!("classify",
            text = %sanitize::preview(text),
            text_hash = %sanitize::hash_text(text),
        )
        .entered();
        let mut failures = Vec::new();

        for attempt in 1..=self.policy.max_attempts {
            match self.attempt(text) {
                Ok((sentiment, summary)) => {
                    debug!(attempt, sentiment = %sentiment, "classification succeeded");
                    return Classification {
                        sentiment,
                        summary,
                        attempts: attempt,
                        failures,
                    };
                }
                Err(reason) => {
                    let delay = self.policy.delay_for(attempt);
                    warn!(
                        attempt,
                        max_attempts = self.policy.max_attempts,
                        delay_secs = delay.as_secs(),
                        error = %reason,
                        "classification attempt failed"
                    );
                    failures.push(AttemptFailure { attempt, reason });
                    self.sleeper.sleep(delay);
                }
            }
        }

        Classification {
            sentiment: Sentiment::Error,
            summary: EXHAUSTED_SUMMARY.to_string(),
            attempts: self.policy.max_attempts,
            failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    /// Replays scripted replies and counts calls.
    struct ScriptedService {
        replies: RefCell<VecDeque<Result<String, ServiceError>>>,
        calls: Rc<RefCell<Vec<String>>>,
    }

    impl CompletionService for ScriptedService {
        fn complete(&self, system: &str, user: &str) -> Result<String, ServiceError> {
            assert_eq!(system, SYSTEM_PROMPT);
            self.calls.borrow_mut().push(user.to_string());
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok("not json".to_string()))
        }
    }

    struct RecordingSleeper(Rc<RefCell<Vec<Duration>>>);

    impl Sleeper for RecordingSleeper {
        fn sleep(&self, duration: Duration) {
            self.0.borrow_mut().push(duration);
        }
    }

    struct Fixture {
        client: ClassificationClient,
        calls: Rc<RefCell<Vec<String>>>,
        sleeps: Rc<RefCell<Vec<Duration>>>,
    }

    fn fixture(replies: Vec<Result<String, ServiceError>>) -> Fixture {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sleeps = Rc::new(RefCell::new(Vec::new()));
        let service = ScriptedService {
            replies: RefCell::new(replies.into()),
            calls: Rc::clone(&calls),
        };
        let client = ClassificationClient::with_sleeper(
            Box::new(service),
            Box::new(RecordingSleeper(Rc::clone(&sleeps))),
            RetryPolicy::default(),
        );
        Fixture {
            client,
            calls,
            sleeps,
        }
    }

    #[test]
    fn test_empty_text_skips_service() {
        let f = fixture(vec![]);
        let result = f.client.classify("");
        assert_eq!(result.pair(), ("none", "No content provided."));
        assert_eq!(result.attempts, 0);
        assert!(f.calls.borrow().is_empty());

        let result = f.client.classify("   ");
        assert_eq!(result.sentiment, Sentiment::None);
        assert!(f.calls.borrow().is_empty());
    }

    #[test]
    fn test_first_attempt_success() {
        let f = fixture(vec![Ok(r#"{"sentiment":"negative","summary":"Bad fit."}"#.to_string())]);
        let result = f.client.classify("Runs small and the zipper broke.");
        assert_eq!(result.pair(), ("negative", "Bad fit."));
        assert_eq!(result.attempts, 1);
        assert_eq!(f.calls.borrow().len(), 1);
        assert_eq!(f.calls.borrow()[0], "Runs small and the zipper broke.");
        assert!(f.sleeps.borrow().is_empty());
    }

    #[test]
    fn test_exhaustion_returns_error_sentinel() {
        let f = fixture(vec![
            Ok("garbage".to_string()),
            Ok("{\"sentiment\": ".to_string()),
            Ok("[]".to_string()),
        ]);
        let result = f.client.classify("Lovely fabric.");
        assert_eq!(result.pair(), ("error", "Model failed to return valid JSON."));
        assert!(result.is_error());
        assert_eq!(result.attempts, 3);
        assert_eq!(f.calls.borrow().len(), 3);
        assert_eq!(
            *f.sleeps.borrow(),
            vec![
                Duration::from_secs(2),
                Duration::from_secs(4),
                Duration::from_secs(8)
            ]
        );
        assert_eq!(result.failures.len(), 3);
        assert!(matches!(
            result.failures[2].reason,
            FailureReason::InvalidReply(ReplyError::NotAnObject)
        ));
    }

    #[test]
    fn test_service_error_then_success() {
        let f = fixture(vec![
            Err(ServiceError::Status {
                status: 503,
                body: "overloaded".to_string(),
            }),
            Ok(r#"{"sentiment":"Positive","summary":"Fits well."}"#.to_string()),
        ]);
        let result = f.client.classify("Fits well.");
        assert_eq!(result.sentiment, Sentiment::Positive);
        assert_eq!(result.attempts, 2);
        assert_eq!(*f.sleeps.borrow(), vec![Duration::from_secs(2)]);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].attempt, 1);
        assert!(matches!(
            result.failures[0].reason,
            FailureReason::Service(ServiceError::Status { status: 503, .. })
        ));
    }

    #[test]
    fn test_reserved_labels_are_retried() {
        let f = fixture(vec![
            Ok(r#"{"sentiment":"none","summary":"Nothing to say."}"#.to_string()),
            Ok(r#"{"sentiment":"error","summary":"Could not tell."}"#.to_string()),
            Ok(r#"{"sentiment":"neutral","summary":"Average."}"#.to_string()),
        ]);
        let result = f.client.classify("It is a shirt.");
        assert_eq!(result.pair(), ("neutral", "Average."));
        assert_eq!(result.attempts, 3);
        assert_eq!(result.failures.len(), 2);
        assert!(matches!(
            &result.failures[0].reason,
            FailureReason::InvalidReply(ReplyError::ReservedLabel(label)) if label == "none"
        ));
        assert!(matches!(
            &result.failures[1].reason,
            FailureReason::InvalidReply(ReplyError::ReservedLabel(label)) if label == "error"
        ));
    }

    #[test]
    fn test_reserved_label_never_becomes_sentinel_without_failures() {
        let reply = r#"{"sentiment":"None","summary":"Nothing to say."}"#;
        let f = fixture(vec![
            Ok(reply.to_string()),
            Ok(reply.to_string()),
            Ok(reply.to_string()),
        ]);
        let result = f.client.classify("Plain review.");
        assert_eq!(result.sentiment, Sentiment::Error);
        assert_eq!(result.attempts, 3);
        assert_eq!(result.failures.len(), 3);
    }

    #[test]
    fn test_policy_delays() {
        let policy = RetryPolicy {
            max_attempts: 5,
            backoff_base_secs: 3,
        };
        assert_eq!(policy.delay_for(1), Duration::from_secs(3));
        assert_eq!(policy.delay_for(2), Duration::from_secs(9));
    }

    #[test]
    fn test_custom_attempt_limit() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sleeps = Rc::new(RefCell::new(Vec::new()));
        let client = ClassificationClient::with_sleeper(
            Box::new(ScriptedService {
                replies: RefCell::new(VecDeque::new()),
                calls: Rc::clone(&calls),
            }),
            Box::new(RecordingSleeper(Rc::clone(&sleeps))),
            RetryPolicy {
                max_attempts: 1,
                backoff_base_secs: 2,
            },
        );
        let result = client.classify("ok");
        assert!(result.is_error());
        assert_eq!(calls.borrow().len(), 1);
        assert_eq!(sleeps.borrow().len(), 1);
    }
}
