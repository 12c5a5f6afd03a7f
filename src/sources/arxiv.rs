//! arXiv research source implementation.

use async_trait::async_trait;
use chrono::Datelike;
use feed_rs::parser;
use std::collections::VecDeque;
use std::sync::Arc;

use crate::models::RawRecord;
use crate::sources::{status_error, RecordStream, Source, SourceError};
use crate::utils::{collapse_whitespace, HttpClient};

/// Base URL for arXiv API
const ARXIV_API_URL: &str = "http://export.arxiv.org/api/query";

/// Entries requested per API call
const PAGE_SIZE: usize = 10;

/// arXiv research source, backed by the Atom query API
#[derive(Debug, Clone)]
pub struct ArxivSource {
    client: Arc<HttpClient>,
    api_url: String,
}

impl ArxivSource {
    /// Create a new arXiv source
    pub fn new() -> Result<Self, SourceError> {
        Ok(Self::with_client(Arc::new(HttpClient::new()?)))
    }

    /// Create with a shared HTTP client
    pub fn with_client(client: Arc<HttpClient>) -> Self {
        Self {
            client,
            api_url: ARXIV_API_URL.to_string(),
        }
    }

    /// Point at a different API endpoint (for testing)
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

#[async_trait]
impl Source for ArxivSource {
    fn id(&self) -> &str {
        "arxiv"
    }

    fn name(&self) -> &str {
        "arXiv"
    }

    async fn open(&self, query: &str) -> Result<Box<dyn RecordStream>, SourceError> {
        let mut stream = ArxivStream {
            client: Arc::clone(&self.client),
            api_url: self.api_url.clone(),
            search_query: format!("all:{}", query),
            buffer: VecDeque::new(),
            start: 0,
            exhausted: false,
        };
        stream.fill().await?;
        Ok(Box::new(stream))
    }
}

struct ArxivStream {
    client: Arc<HttpClient>,
    api_url: String,
    search_query: String,
    buffer: VecDeque<RawRecord>,
    start: usize,
    exhausted: bool,
}

impl ArxivStream {
    async fn fill(&mut self) -> Result<(), SourceError> {
        let url = format!(
            "{}?search_query={}&start={}&max_results={}&sortBy=relevance&sortOrder=descending",
            self.api_url,
            urlencoding::encode(&self.search_query),
            self.start,
            PAGE_SIZE
        );
        tracing::debug!("Fetching arXiv page: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to search arXiv: {}", e)))?;

        if !response.status().is_success() {
            return Err(status_error("arXiv", response.status()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SourceError::Parse(format!("Failed to read response: {}", e)))?;

        let records = parse_feed(&body)?;
        if records.len() < PAGE_SIZE {
            self.exhausted = true;
        }
        self.start += PAGE_SIZE;
        self.buffer.extend(records);
        Ok(())
    }
}

#[async_trait]
impl RecordStream for ArxivStream {
    async fn next_record(&mut self) -> Option<Result<RawRecord, SourceError>> {
        if self.buffer.is_empty() && !self.exhausted {
            if let Err(e) = self.fill().await {
                return Some(Err(e));
            }
        }
        self.buffer.pop_front().map(Ok)
    }
}

/// Parse an arXiv Atom feed into raw records
fn parse_feed(body: &[u8]) -> Result<Vec<RawRecord>, SourceError> {
    let feed = parser::parse(body)?;
    Ok(feed.entries.iter().map(parse_entry).collect())
}

fn parse_entry(entry: &feed_rs::model::Entry) -> RawRecord {
    let title = entry
        .title
        .as_ref()
        .map(|t| collapse_whitespace(&t.content))
        .unwrap_or_default();

    let summary = entry
        .summary
        .as_ref()
        .map(|s| collapse_whitespace(&s.content))
        .unwrap_or_default();

    let year = entry
        .published
        .map(|d| d.year().to_string())
        .unwrap_or_default();

    let url = entry
        .links
        .iter()
        .find(|link| link.rel.as_deref() == Some("alternate"))
        .map(|link| link.href.clone())
        .unwrap_or_else(|| entry.id.clone());

    RawRecord::new(title)
        .authors(entry.authors.iter().map(|a| a.name.clone()))
        .abstract_text(summary)
        .pub_year(year)
        .url(url)
}
