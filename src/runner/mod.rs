//! The keyword sweep.
//!
//! [`SearchRunner`] walks its keyword list in order. For each keyword it
//! opens a stream on the configured [`Source`] with the query
//! `"<keyword> <year_from>"`, pulls at most `max_per_keyword` records, and
//! keeps those published in or after `year_from`. Faults are absorbed where
//! they happen:
//!
//! | event                       | effect                          | pause            |
//! |-----------------------------|---------------------------------|------------------|
//! | record processed            | kept or skipped                 | `record`         |
//! | stream ends                 | stop pulling this keyword       | none             |
//! | pull fails                  | logged, counts against the cap  | `record_error`   |
//! | keyword finished            | next keyword                    | `keyword`        |
//! | stream cannot be opened     | logged, keyword abandoned       | `keyword_error`  |
//!
//! Everything runs sequentially on the calling task; pauses are plain sleeps.

use chrono::Utc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::config::{DelayConfig, SweepConfig};
use crate::models::PaperRecord;
use crate::sources::Source;
use crate::utils::dedup_by_title;

/// Per-keyword tally of a sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordOutcome {
    pub keyword: String,
    pub query: String,
    /// Pull attempts made, including the one that hit end of results
    pub pulled: usize,
    pub accepted: usize,
    /// Records dropped by the year filter
    pub skipped: usize,
    pub failed_pulls: usize,
    /// The stream ran out before the cap was reached
    pub exhausted: bool,
    /// Set when the stream could not be opened at all
    pub open_error: Option<String>,
}

/// Result of a full sweep, before deduplication
#[derive(Debug, Clone, Default)]
pub struct SweepReport {
    /// Accepted records in keyword order; may contain duplicate titles
    pub papers: Vec<PaperRecord>,
    pub keywords: Vec<KeywordOutcome>,
}

impl SweepReport {
    /// Accepted records with duplicate titles removed (first one wins)
    pub fn unique_papers(self) -> Vec<PaperRecord> {
        dedup_by_title(self.papers)
    }

    /// Keywords whose search could not be opened
    pub fn failed_keywords(&self) -> impl Iterator<Item = &KeywordOutcome> {
        self.keywords.iter().filter(|k| k.open_error.is_some())
    }
}

/// Sequential, rate-limited keyword sweep over one source
#[derive(Debug)]
pub struct SearchRunner<'a> {
    source: &'a dyn Source,
    keywords: Vec<String>,
    year_from: i32,
    max_per_keyword: usize,
    delays: DelayConfig,
}

impl<'a> SearchRunner<'a> {
    /// Create a runner with default year, cap and delays
    pub fn new(source: &'a dyn Source, keywords: Vec<String>) -> Self {
        let defaults = SweepConfig::default();
        Self {
            source,
            keywords,
            year_from: defaults.year_from,
            max_per_keyword: defaults.max_per_keyword,
            delays: defaults.delays,
        }
    }

    /// Create a runner from loaded configuration
    pub fn from_config(source: &'a dyn Source, config: &SweepConfig) -> Self {
        Self {
            source,
            keywords: config.keywords.clone(),
            year_from: config.year_from,
            max_per_keyword: config.max_per_keyword,
            delays: config.delays,
        }
    }

    pub fn year_from(mut self, year_from: i32) -> Self {
        self.year_from = year_from;
        self
    }

    pub fn max_per_keyword(mut self, max: usize) -> Self {
        self.max_per_keyword = max;
        self
    }

    pub fn delays(mut self, delays: DelayConfig) -> Self {
        self.delays = delays;
        self
    }

    /// Sweep every keyword in order.
    ///
    /// Never fails: per-record and per-keyword faults are logged and recorded
    /// in the report.
    pub async fn run(&self) -> SweepReport {
        let mut report = SweepReport::default();

        for keyword in &self.keywords {
            let outcome = self.sweep_keyword(keyword, &mut report.papers).await;
            report.keywords.push(outcome);
        }

        report
    }

    async fn sweep_keyword(&self, keyword: &str, papers: &mut Vec<PaperRecord>) -> KeywordOutcome {
        let query = build_query(keyword, self.year_from);
        let mut outcome = KeywordOutcome {
            keyword: keyword.to_string(),
            query: query.clone(),
            ..KeywordOutcome::default()
        };

        info!("Searching {}: {}", self.source.name(), query);

        let mut stream = match self.source.open(&query).await {
            Ok(stream) => stream,
            Err(e) => {
                error!("Search error for \"{}\": {}", keyword, e);
                outcome.open_error = Some(e.to_string());
                pause(self.delays.keyword_error()).await;
                return outcome;
            }
        };

        while outcome.pulled < self.max_per_keyword {
            outcome.pulled += 1;

            match stream.next_record().await {
                None => {
                    outcome.exhausted = true;
                    break;
                }
                Some(Ok(raw)) => {
                    if raw.published_since(self.year_from) {
                        papers.push(PaperRecord::from_raw(raw, self.source.id(), Utc::now()));
                        outcome.accepted += 1;
                    } else {
                        debug!(
                            "Skipping \"{}\" (year {:?} before {})",
                            raw.title(),
                            raw.year(),
                            self.year_from
                        );
                        outcome.skipped += 1;
                    }
                    pause(self.delays.record()).await;
                }
                Some(Err(e)) => {
                    warn!("Error fetching paper: {}", e);
                    outcome.failed_pulls += 1;
                    pause(self.delays.record_error()).await;
                }
            }
        }

        info!("Found {} papers for \"{}\"", outcome.accepted, keyword);
        pause(self.delays.keyword()).await;
        outcome
    }
}

/// Query sent to the source for one keyword
pub fn build_query(keyword: &str, year_from: i32) -> String {
    format!("{} {}", keyword, year_from)
}

/// Serialize records as a JSON array indented by two spaces
pub fn to_json(papers: &[PaperRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(papers)
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}
