//! Search providers behind a lazy, pull-based record interface.
//!
//! A [`Source`] turns a query string into a [`RecordStream`]. The stream is
//! consumed one record at a time and may end, fail on a single pull, or go on
//! indefinitely; the sweep decides how many pulls to make.
//!
//! # Feature Flags
//!
//! - `google_scholar` - Enable Google Scholar source (default: enabled)
//! - `arxiv` - Enable arXiv source (default: enabled)
//!
//! The [`MockSource`] is always compiled and serves scripted streams for tests.

#[cfg(feature = "source-arxiv")]
mod arxiv;
#[cfg(feature = "source-google_scholar")]
mod google_scholar;
mod registry;

pub mod mock;

#[cfg(feature = "source-arxiv")]
pub use arxiv::ArxivSource;
#[cfg(feature = "source-google_scholar")]
pub use google_scholar::GoogleScholarSource;
pub use mock::{MockSource, MockStep};
pub use registry::SourceRegistry;

use async_trait::async_trait;

use crate::models::RawRecord;

/// A scholarly search provider.
///
/// # Implementing a New Source
///
/// 1. Create a struct that implements `Source`
/// 2. Return a [`RecordStream`] from `open` that fetches lazily
/// 3. Register it in `SourceRegistry::from_config()`
#[async_trait]
pub trait Source: Send + Sync + std::fmt::Debug {
    /// Unique identifier, also used as the `source` tag of emitted records
    fn id(&self) -> &str;

    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Open a result stream for `query`.
    ///
    /// An error here means the whole query failed; errors from the returned
    /// stream affect a single pull only.
    async fn open(&self, query: &str) -> Result<Box<dyn RecordStream>, SourceError>;
}

/// Lazily produced search hits for one query
#[async_trait]
pub trait RecordStream: Send {
    /// Pull the next record.
    ///
    /// `None` signals the end of results. `Some(Err(_))` is a failed pull;
    /// the stream stays usable and the caller may pull again.
    async fn next_record(&mut self) -> Option<Result<RawRecord, SourceError>>;
}

/// Errors that can occur when interacting with a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Parsing error (XML, HTML, etc.)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Rate limit exceeded or the provider is serving a captcha
    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    /// API error from the source
    #[error("API error: {0}")]
    Api(String),

    /// Other error
    #[error("Error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

impl From<feed_rs::parser::ParseFeedError> for SourceError {
    fn from(err: feed_rs::parser::ParseFeedError) -> Self {
        SourceError::Parse(format!("Feed: {}", err))
    }
}

/// Map a non-success HTTP status to a source error
pub(crate) fn status_error(source_name: &str, status: reqwest::StatusCode) -> SourceError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        SourceError::RateLimit(format!("{} returned status: {}", source_name, status))
    } else {
        SourceError::Api(format!("{} returned status: {}", source_name, status))
    }
}
