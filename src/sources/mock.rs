//! Mock source for testing purposes.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::models::RawRecord;
use crate::sources::{RecordStream, Source, SourceError};

/// One scripted pull result
#[derive(Debug, Clone)]
pub enum MockStep {
    /// Yield this record
    Record(RawRecord),
    /// Fail this pull with the given message
    Fail(String),
}

#[derive(Debug, Clone)]
enum Script {
    Steps {
        steps: Vec<MockStep>,
        /// Repeated forever once the steps run out
        endless: Option<RawRecord>,
    },
    OpenFailure(String),
}

/// A mock source that serves scripted streams keyed by exact query string.
///
/// Queries without a script open an empty stream.
#[derive(Debug, Default)]
pub struct MockSource {
    scripts: HashMap<String, Script>,
    pulls: Arc<Mutex<HashMap<String, usize>>>,
    opened: Mutex<Vec<String>>,
}

impl MockSource {
    /// Create a new mock source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `records` for `query`, then end the stream.
    pub fn with_records(self, query: &str, records: Vec<RawRecord>) -> Self {
        self.with_steps(query, records.into_iter().map(MockStep::Record).collect())
    }

    /// Serve scripted steps for `query`, then end the stream.
    pub fn with_steps(mut self, query: &str, steps: Vec<MockStep>) -> Self {
        self.scripts.insert(
            query.to_string(),
            Script::Steps {
                steps,
                endless: None,
            },
        );
        self
    }

    /// Serve `record` for `query` forever.
    pub fn with_endless(mut self, query: &str, record: RawRecord) -> Self {
        self.scripts.insert(
            query.to_string(),
            Script::Steps {
                steps: Vec::new(),
                endless: Some(record),
            },
        );
        self
    }

    /// Fail to open a stream for `query`.
    pub fn with_open_failure(mut self, query: &str, message: &str) -> Self {
        self.scripts
            .insert(query.to_string(), Script::OpenFailure(message.to_string()));
        self
    }

    /// Number of pulls made on streams for `query`
    pub fn pulls(&self, query: &str) -> usize {
        let guard = self.pulls.lock().unwrap();
        guard.get(query).copied().unwrap_or(0)
    }

    /// Queries passed to `open`, in call order
    pub fn opened_queries(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

#[async_trait]
impl Source for MockSource {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock Source"
    }

    async fn open(&self, query: &str) -> Result<Box<dyn RecordStream>, SourceError> {
        self.opened.lock().unwrap().push(query.to_string());

        let (steps, endless) = match self.scripts.get(query) {
            Some(Script::OpenFailure(message)) => return Err(SourceError::Other(message.clone())),
            Some(Script::Steps { steps, endless }) => (steps.clone(), endless.clone()),
            None => (Vec::new(), None),
        };

        Ok(Box::new(MockStream {
            query: query.to_string(),
            steps: steps.into(),
            endless,
            pulls: Arc::clone(&self.pulls),
        }))
    }
}

struct MockStream {
    query: String,
    steps: VecDeque<MockStep>,
    endless: Option<RawRecord>,
    pulls: Arc<Mutex<HashMap<String, usize>>>,
}

#[async_trait]
impl RecordStream for MockStream {
    async fn next_record(&mut self) -> Option<Result<RawRecord, SourceError>> {
        *self.pulls.lock().unwrap().entry(self.query.clone()).or_default() += 1;

        match self.steps.pop_front() {
            Some(MockStep::Record(record)) => Some(Ok(record)),
            Some(MockStep::Fail(message)) => Some(Err(SourceError::Other(message))),
            None => self.endless.clone().map(Ok),
        }
    }
}
