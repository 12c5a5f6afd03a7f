//! # Scholar Sweep
//!
//! Sweeps a scholarly search provider with a fixed list of topical keywords,
//! keeps papers published in or after a given year, removes duplicate titles
//! and emits the result as a JSON feed.
//!
//! ## Architecture
//!
//! - [`models`]: Raw search hits and the emitted [`PaperRecord`]
//! - [`sources`]: Search providers behind the lazy [`RecordStream`](sources::RecordStream) interface
//! - [`runner`]: The rate-limited keyword sweep
//! - [`utils`]: HTTP client, deduplication and text helpers
//! - [`config`]: Configuration management
//!
//! ## Example
//!
//! ```rust
//! use scholar_sweep::config::DelayConfig;
//! use scholar_sweep::models::RawRecord;
//! use scholar_sweep::runner::SearchRunner;
//! use scholar_sweep::sources::MockSource;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let source = MockSource::new().with_records(
//!     "voice agent 2024",
//!     vec![RawRecord::new("Paper A").pub_year("2025")],
//! );
//!
//! let papers = SearchRunner::new(&source, vec!["voice agent".to_string()])
//!     .delays(DelayConfig::none())
//!     .run()
//!     .await
//!     .unique_papers();
//!
//! assert_eq!(papers.len(), 1);
//! # }
//! ```

pub mod config;
pub mod models;
pub mod runner;
pub mod sources;
pub mod utils;

// Re-export commonly used types
pub use models::PaperRecord;
pub use runner::SearchRunner;
pub use sources::{Source, SourceRegistry};
