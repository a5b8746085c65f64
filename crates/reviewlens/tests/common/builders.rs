//! Builder patterns and fakes for creating test data programmatically.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use reviewlens::classifier::{CompletionService, ServiceError, Sleeper};
use reviewlens::config::Config;
use reviewlens::Table;

/// Builder for `Table` instances.
pub struct TableBuilder {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TableBuilder {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Table with the default `Review Text` / `Class Name` columns.
    pub fn reviews() -> Self {
        Self::new(&["Review Text", "Class Name"])
    }

    pub fn row(mut self, cells: &[&str]) -> Self {
        self.rows.push(cells.iter().map(|c| c.to_string()).collect());
        self
    }

    /// Adds `n` rows with the same review text and category.
    pub fn rows(mut self, n: usize, text: &str, category: &str) -> Self {
        for _ in 0..n {
            self = self.row(&[text, category]);
        }
        self
    }

    pub fn build(self) -> Table {
        Table::from_rows(self.headers, self.rows)
    }

    /// Renders the table as CSV text.
    pub fn to_csv(&self) -> String {
        let mut writer = csv_writer();
        writer.write_record(&self.headers).unwrap();
        for row in &self.rows {
            writer.write_record(row).unwrap();
        }
        String::from_utf8(writer.into_inner().unwrap()).unwrap()
    }
}

fn csv_writer() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new().from_writer(Vec::new())
}

/// Builder for `Config` instances.
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        let mut config = Config::default();
        config.service.api_key = Some("test-key".to_string());
        Self { config }
    }

    pub fn batch_size(mut self, size: usize) -> Self {
        self.config.batch_size = size;
        self
    }

    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.config.retry.max_attempts = attempts;
        self
    }

    pub fn row_limit(mut self, limit: Option<usize>) -> Self {
        self.config.dataset.row_limit = limit;
        self
    }

    pub fn columns(mut self, text: &str, category: &str) -> Self {
        self.config.dataset.text_column = text.to_string();
        self.config.dataset.category_column = category.to_string();
        self
    }

    pub fn output_directory(mut self, dir: &str) -> Self {
        self.config.output.directory = dir.to_string();
        self
    }

    pub fn protect(mut self, protect: bool) -> Self {
        self.config.output.protect = protect;
        self
    }

    pub fn include_sentinels(mut self, include: bool) -> Self {
        self.config.analytics.include_sentinels = include;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Replays queued replies in order and records every user message.
#[derive(Clone, Default)]
pub struct ScriptedService {
    replies: Rc<RefCell<VecDeque<Result<String, ServiceError>>>>,
    calls: Rc<RefCell<Vec<String>>>,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, raw: &str) -> Self {
        self.replies.borrow_mut().push_back(Ok(raw.to_string()));
        self
    }

    pub fn fail(self, error: ServiceError) -> Self {
        self.replies.borrow_mut().push_back(Err(error));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl CompletionService for ScriptedService {
    fn complete(&self, _system: &str, user: &str) -> Result<String, ServiceError> {
        self.calls.borrow_mut().push(user.to_string());
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or(Err(ServiceError::EmptyReply))
    }
}

/// Answers from the review text itself: texts mentioning "small", "tight" or
/// "returned" are negative, "okay" neutral, "garbage" gets a malformed reply,
/// everything else positive.
#[derive(Clone, Default)]
pub struct KeywordService {
    calls: Rc<RefCell<usize>>,
}

impl KeywordService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        *self.calls.borrow()
    }
}

impl CompletionService for KeywordService {
    fn complete(&self, _system: &str, user: &str) -> Result<String, ServiceError> {
        *self.calls.borrow_mut() += 1;
        let text = user.to_lowercase();
        let sentiment = if text.contains("garbage") {
            return Ok("I think this review is negative.".to_string());
        } else if ["small", "tight", "returned"].iter().any(|w| text.contains(w)) {
            "negative"
        } else if text.contains("okay") {
            "neutral"
        } else {
            "positive"
        };
        Ok(format!(
            r#"{{"sentiment": "{}", "summary": "Customer review."}}"#,
            sentiment
        ))
    }
}

/// Records requested delays instead of sleeping.
#[derive(Clone, Default)]
pub struct RecordingSleeper {
    delays: Rc<RefCell<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delays(&self) -> Vec<Duration> {
        self.delays.borrow().clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.delays.borrow_mut().push(duration);
    }
}
