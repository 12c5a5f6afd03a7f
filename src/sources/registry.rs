//! Registry of available search sources.

use std::collections::HashMap;
use std::sync::Arc;

use super::{Source, SourceError};
use crate::config::HttpConfig;
use crate::utils::HttpClient;

/// Registry for all available search sources
///
/// Sources are looked up by their [`Source::id`], which is also the value
/// accepted by `--source`.
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    sources: HashMap<String, Arc<dyn Source>>,
}

impl SourceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every compiled-in network source sharing one
    /// HTTP client
    pub fn from_config(http: &HttpConfig) -> Result<Self, SourceError> {
        #[allow(unused_variables)]
        let client = Arc::new(HttpClient::from_config(http)?);
        #[allow(unused_mut)]
        let mut registry = Self::new();

        #[cfg(feature = "source-google_scholar")]
        registry.register(Arc::new(super::GoogleScholarSource::with_client(
            Arc::clone(&client),
        )));

        #[cfg(feature = "source-arxiv")]
        registry.register(Arc::new(super::ArxivSource::with_client(Arc::clone(
            &client,
        ))));

        Ok(registry)
    }

    /// Register a new source
    pub fn register(&mut self, source: Arc<dyn Source>) {
        self.sources.insert(source.id().to_string(), source);
    }

    /// Get a source by ID
    pub fn get(&self, id: &str) -> Option<&Arc<dyn Source>> {
        self.sources.get(id)
    }

    /// Get a source by ID, returning an error if not found
    pub fn get_required(&self, id: &str) -> Result<&Arc<dyn Source>, SourceError> {
        self.get(id).ok_or_else(|| {
            SourceError::Other(format!(
                "Unknown source '{}' (available: {})",
                id,
                self.ids().join(", ")
            ))
        })
    }

    /// All source IDs, sorted
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.sources.keys().map(|s| s.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    /// Check if a source exists
    pub fn has(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    /// Get the number of registered sources
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
