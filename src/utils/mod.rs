//! Utility modules supporting the sweep.
//!
//! - [`dedup_by_title`]: Drop records whose lowercased title was already seen
//! - [`HttpClient`]: Shared HTTP client built from [`HttpConfig`](crate::config::HttpConfig)
//! - [`collapse_whitespace`]: Normalize whitespace in scraped text
//!
//! # Deduplication
//!
//! ```rust
//! use scholar_sweep::utils::dedup_by_title;
//! use scholar_sweep::models::PaperRecord;
//!
//! # fn example(papers: Vec<PaperRecord>) {
//! let unique = dedup_by_title(papers);
//! # }
//! ```

mod dedup;
mod http;

pub use dedup::dedup_by_title;
pub use http::HttpClient;

/// Collapse runs of whitespace (including non-breaking spaces) into single spaces
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  Voice\n   Agents\u{a0}Now "), "Voice Agents Now");
        assert_eq!(collapse_whitespace(""), "");
    }
}
