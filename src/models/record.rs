//! Raw bibliographic records as handed out by a source stream.

use serde::{Deserialize, Serialize};

/// Bibliographic block of a raw search hit.
///
/// Every field is optional on the wire and defaults to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bib {
    #[serde(default)]
    pub title: String,

    /// Author names in the order the provider lists them
    #[serde(default)]
    pub author: Vec<String>,

    #[serde(default)]
    pub r#abstract: String,

    /// Publication year as supplied (not validated)
    #[serde(default)]
    pub pub_year: String,
}

/// A single unvalidated search hit.
///
/// Mirrors the shape scholarly-search providers commonly return:
/// `{"bib": {"title", "author", "abstract", "pub_year"}, "pub_url"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub bib: Bib,

    #[serde(default)]
    pub pub_url: String,
}

impl RawRecord {
    /// Create a record with only a title set
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            bib: Bib {
                title: title.into(),
                ..Bib::default()
            },
            pub_url: String::new(),
        }
    }

    /// Set the author list
    pub fn authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bib.author = authors.into_iter().map(Into::into).collect();
        self
    }

    /// Set the abstract
    pub fn abstract_text(mut self, text: impl Into<String>) -> Self {
        self.bib.r#abstract = text.into();
        self
    }

    /// Set the publication year
    pub fn pub_year(mut self, year: impl Into<String>) -> Self {
        self.bib.pub_year = year.into();
        self
    }

    /// Set the publication URL
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.pub_url = url.into();
        self
    }

    pub fn title(&self) -> &str {
        &self.bib.title
    }

    pub fn year(&self) -> &str {
        &self.bib.pub_year
    }

    /// Whether the publication year parses as an integer at or after `year_from`.
    ///
    /// A missing or non-numeric year never qualifies.
    pub fn published_since(&self, year_from: i32) -> bool {
        self.bib
            .pub_year
            .trim()
            .parse::<i32>()
            .map(|year| year >= year_from)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_empty() {
        let raw: RawRecord = serde_json::from_str(r#"{"bib": {"title": "Only Title"}}"#).unwrap();
        assert_eq!(raw.title(), "Only Title");
        assert!(raw.bib.author.is_empty());
        assert_eq!(raw.bib.r#abstract, "");
        assert_eq!(raw.year(), "");
        assert_eq!(raw.pub_url, "");

        let empty: RawRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, RawRecord::default());
    }

    #[test]
    fn test_published_since() {
        assert!(RawRecord::new("a").pub_year("2024").published_since(2024));
        assert!(RawRecord::new("a").pub_year(" 2025 ").published_since(2024));
        assert!(!RawRecord::new("a").pub_year("2023").published_since(2024));
        assert!(!RawRecord::new("a").published_since(2024));
        assert!(!RawRecord::new("a").pub_year("forthcoming").published_since(2024));
    }
}
