//! Paper record emitted by a sweep.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::RawRecord;

/// Maximum abstract length, in characters
pub const MAX_ABSTRACT_CHARS: usize = 500;

/// A paper accepted into the sweep output
///
/// Serializes with the field names downstream feed consumers expect:
/// `id, title, authors, abstract, year, url, source, discoveredAt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperRecord {
    /// `<source>_<hash>` where the hash is derived from the title
    pub id: String,

    pub title: String,

    /// Author names joined with ", "
    pub authors: String,

    /// Abstract text, at most [`MAX_ABSTRACT_CHARS`] characters
    pub r#abstract: String,

    /// Publication year as supplied by the source
    pub year: String,

    /// Paper page URL (may be empty)
    pub url: String,

    /// Identifier of the source that produced the record
    pub source: String,

    /// When this run produced the record
    pub discovered_at: DateTime<Utc>,
}

impl PaperRecord {
    /// Build a record from a raw search hit.
    ///
    /// Does not check the publication year; callers filter first.
    pub fn from_raw(raw: RawRecord, source: &str, discovered_at: DateTime<Utc>) -> Self {
        let RawRecord { bib, pub_url } = raw;

        Self {
            id: paper_id(source, &bib.title),
            authors: bib.author.join(", "),
            r#abstract: truncate_chars(&bib.r#abstract, MAX_ABSTRACT_CHARS),
            title: bib.title,
            year: bib.pub_year,
            url: pub_url,
            source: source.to_string(),
            discovered_at,
        }
    }

    /// Key used for title deduplication
    pub fn title_key(&self) -> String {
        self.title.to_lowercase()
    }
}

/// Deterministic identifier: source prefix plus the first 16 hex digits of
/// the SHA-256 of the title.
pub fn paper_id(source: &str, title: &str) -> String {
    let digest = Sha256::digest(title.as_bytes());
    let hex = format!("{:x}", digest);
    format!("{}_{}", source, &hex[..16])
}

/// Truncate to at most `max` characters without splitting a code point
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_from_raw() {
        let raw = RawRecord::new("Full-Duplex Voice Agents")
            .authors(["A", "B"])
            .abstract_text("We study agents.")
            .pub_year("2025")
            .url("https://example.com/paper");

        let paper = PaperRecord::from_raw(raw, "google_scholar", fixed_time());

        assert_eq!(paper.title, "Full-Duplex Voice Agents");
        assert_eq!(paper.authors, "A, B");
        assert_eq!(paper.r#abstract, "We study agents.");
        assert_eq!(paper.year, "2025");
        assert_eq!(paper.url, "https://example.com/paper");
        assert_eq!(paper.source, "google_scholar");
        assert!(paper.id.starts_with("google_scholar_"));
        assert_eq!(paper.id.len(), "google_scholar_".len() + 16);
    }

    #[test]
    fn test_missing_authors_render_empty() {
        let paper = PaperRecord::from_raw(RawRecord::new("T").pub_year("2024"), "arxiv", fixed_time());
        assert_eq!(paper.authors, "");
        assert_eq!(paper.url, "");
    }

    #[test]
    fn test_abstract_truncated_by_characters() {
        let long = "é".repeat(700);
        let raw = RawRecord::new("T").abstract_text(long).pub_year("2024");
        let paper = PaperRecord::from_raw(raw, "arxiv", fixed_time());
        assert_eq!(paper.r#abstract.chars().count(), MAX_ABSTRACT_CHARS);

        assert_eq!(truncate_chars("short", 500), "short");
        assert_eq!(truncate_chars("abcdef", 3), "abc");
    }

    #[test]
    fn test_id_is_deterministic() {
        assert_eq!(paper_id("google_scholar", "Paper A"), paper_id("google_scholar", "Paper A"));
        assert_ne!(paper_id("google_scholar", "Paper A"), paper_id("google_scholar", "Paper B"));
        assert_ne!(paper_id("arxiv", "Paper A"), paper_id("google_scholar", "Paper A"));
    }

    #[test]
    fn test_json_field_names() {
        let paper = PaperRecord::from_raw(RawRecord::new("T").pub_year("2024"), "arxiv", fixed_time());
        let value = serde_json::to_value(&paper).unwrap();
        let object = value.as_object().unwrap();

        for key in ["id", "title", "authors", "abstract", "year", "url", "source", "discoveredAt"] {
            assert!(object.contains_key(key), "missing key {}", key);
        }
        assert_eq!(object.len(), 8);
        assert!(object["discoveredAt"]
            .as_str()
            .unwrap()
            .starts_with("2025-03-01T12:00:00"));
    }
}
