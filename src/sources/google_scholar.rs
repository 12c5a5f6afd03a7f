//! Google Scholar research source implementation.
//!
//! Google Scholar does not have an official public API. This implementation
//! scrapes the public results pages, ten hits per page, and is easily blocked
//! by Google's anti-bot measures; a blocked page is reported as
//! [`SourceError::RateLimit`]. Use at your own risk.

use async_trait::async_trait;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::VecDeque;
use std::sync::{Arc, OnceLock};

use crate::models::RawRecord;
use crate::sources::{status_error, RecordStream, Source, SourceError};
use crate::utils::{collapse_whitespace, HttpClient};

const GOOGLE_SCHOLAR_URL: &str = "https://scholar.google.com";

/// Results per page served by Scholar
const PAGE_SIZE: usize = 10;

/// Google Scholar research source
#[derive(Debug, Clone)]
pub struct GoogleScholarSource {
    client: Arc<HttpClient>,
    base_url: String,
}

impl GoogleScholarSource {
    pub fn new() -> Result<Self, SourceError> {
        Ok(Self::with_client(Arc::new(HttpClient::new()?)))
    }

    /// Create with a shared HTTP client
    pub fn with_client(client: Arc<HttpClient>) -> Self {
        Self {
            client,
            base_url: GOOGLE_SCHOLAR_URL.to_string(),
        }
    }

    /// Point at a different host (for testing)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl Source for GoogleScholarSource {
    fn id(&self) -> &str {
        "google_scholar"
    }

    fn name(&self) -> &str {
        "Google Scholar"
    }

    async fn open(&self, query: &str) -> Result<Box<dyn RecordStream>, SourceError> {
        let mut stream = ScholarStream {
            client: Arc::clone(&self.client),
            base_url: self.base_url.clone(),
            query: query.to_string(),
            buffer: VecDeque::new(),
            next_start: 0,
            exhausted: false,
        };

        // The first page is fetched eagerly so a blocked or failing search
        // surfaces here rather than on the first pull.
        stream.fill().await?;
        Ok(Box::new(stream))
    }
}

/// Lazily paged Scholar results for one query
struct ScholarStream {
    client: Arc<HttpClient>,
    base_url: String,
    query: String,
    buffer: VecDeque<RawRecord>,
    next_start: usize,
    exhausted: bool,
}

impl ScholarStream {
    /// Fetch the next page into the buffer.
    ///
    /// On failure the page offset is left untouched so the next pull retries it.
    async fn fill(&mut self) -> Result<(), SourceError> {
        let url = format!(
            "{}/scholar?hl=en&q={}&start={}",
            self.base_url,
            urlencoding::encode(&self.query),
            self.next_start
        );
        tracing::debug!("Fetching Google Scholar page: {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "text/html")
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to search Google Scholar: {}", e)))?;

        if !response.status().is_success() {
            return Err(status_error("Google Scholar", response.status()));
        }

        let html = response
            .text()
            .await
            .map_err(|e| SourceError::Parse(format!("Failed to read response: {}", e)))?;

        let page = parse_results(&html)?;
        if page.entries < PAGE_SIZE {
            self.exhausted = true;
        }
        self.next_start += PAGE_SIZE;
        self.buffer.extend(page.records);
        Ok(())
    }
}

#[async_trait]
impl RecordStream for ScholarStream {
    async fn next_record(&mut self) -> Option<Result<RawRecord, SourceError>> {
        if self.buffer.is_empty() && !self.exhausted {
            if let Err(e) = self.fill().await {
                return Some(Err(e));
            }
        }
        self.buffer.pop_front().map(Ok)
    }
}

/// One parsed results page
struct ScholarPage {
    records: Vec<RawRecord>,
    /// Result blocks on the page, counting those dropped for lacking a title
    entries: usize,
}

/// Selectors for the fields of a result block, built once per page
struct EntrySelectors {
    title: Selector,
    link: Selector,
    byline: Selector,
    snippet: Selector,
}

impl EntrySelectors {
    fn new() -> Result<Self, SourceError> {
        Ok(Self {
            title: selector("h3.gs_rt")?,
            link: selector("h3.gs_rt a")?,
            byline: selector("div.gs_a")?,
            snippet: selector("div.gs_rs")?,
        })
    }
}

/// Parse one Scholar results page
fn parse_results(html: &str) -> Result<ScholarPage, SourceError> {
    if is_blocked(html) {
        return Err(SourceError::RateLimit(
            "Google Scholar is serving a captcha".to_string(),
        ));
    }

    let document = Html::parse_document(html);
    let entry_selector = selector("div.gs_ri")?;
    let selectors = EntrySelectors::new()?;

    let mut entries = 0;
    let records = document
        .select(&entry_selector)
        .inspect(|_| entries += 1)
        .filter_map(|entry| parse_entry(&entry, &selectors))
        .collect();

    Ok(ScholarPage { records, entries })
}

fn is_blocked(html: &str) -> bool {
    html.contains("gs_captcha") || html.contains("id=\"captcha") || html.contains("unusual traffic")
}

fn selector(css: &str) -> Result<Selector, SourceError> {
    Selector::parse(css).map_err(|e| SourceError::Parse(format!("Bad selector '{}': {}", css, e)))
}

/// Parse a single result block; entries without a title are dropped
fn parse_entry(entry: &ElementRef, selectors: &EntrySelectors) -> Option<RawRecord> {
    let heading = entry.select(&selectors.title).next()?;
    let link = entry.select(&selectors.link).next();

    let title = match link {
        Some(a) => collapse_whitespace(&a.text().collect::<String>()),
        None => strip_type_markers(&collapse_whitespace(&heading.text().collect::<String>())),
    };
    if title.is_empty() {
        return None;
    }

    let url = link
        .and_then(|a| a.value().attr("href"))
        .unwrap_or_default()
        .to_string();

    let byline = entry
        .select(&selectors.byline)
        .next()
        .map(|b| collapse_whitespace(&b.text().collect::<String>()))
        .unwrap_or_default();
    let (authors, year) = parse_byline(&byline);

    let snippet = entry
        .select(&selectors.snippet)
        .next()
        .map(|s| collapse_whitespace(&s.text().collect::<String>()))
        .unwrap_or_default();

    Some(
        RawRecord::new(title)
            .authors(authors)
            .abstract_text(snippet)
            .pub_year(year)
            .url(url),
    )
}

/// Remove leading `[PDF]`, `[HTML]`, `[CITATION][C]` style markers
fn strip_type_markers(title: &str) -> String {
    static MARKERS: OnceLock<Option<Regex>> = OnceLock::new();
    match MARKERS.get_or_init(|| Regex::new(r"^(\s*\[[A-Z]+\]\s*)+").ok()) {
        Some(re) => re.replace(title, "").trim().to_string(),
        None => title.trim().to_string(),
    }
}

/// Split a byline like `A Smith, B Jones - Venue, 2024 - host.org` into
/// author names and publication year.
fn parse_byline(byline: &str) -> (Vec<String>, String) {
    static YEAR: OnceLock<Option<Regex>> = OnceLock::new();
    let year_pattern = YEAR.get_or_init(|| Regex::new(r"\b(?:19|20)\d{2}\b").ok());

    let mut parts = byline.split(" - ");
    let author_part = parts.next().unwrap_or_default();
    let venue_part = parts.next().unwrap_or_default();

    let authors = author_part
        .split(',')
        .map(|name| name.trim().trim_end_matches('…').trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();

    let year = year_pattern
        .as_ref()
        .and_then(|re| re.find_iter(venue_part).last())
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    (authors, year)
}
