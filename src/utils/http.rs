//! HTTP client utilities.

use reqwest::{Client, Proxy, RequestBuilder};
use std::time::Duration;

use crate::config::HttpConfig;
use crate::sources::SourceError;

/// Shared HTTP client with sensible defaults
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, SourceError> {
        Self::from_config(&HttpConfig::default())
    }

    /// Create a client from configured timeouts, user agent and proxy
    pub fn from_config(config: &HttpConfig) -> Result<Self, SourceError> {
        let mut builder = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .pool_idle_timeout(Duration::from_secs(90));

        if let Some(proxy) = &config.proxy {
            let proxy = Proxy::all(proxy)
                .map_err(|e| SourceError::Other(format!("Invalid proxy '{}': {}", proxy, e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| SourceError::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Start a GET request
    pub fn get(&self, url: &str) -> RequestBuilder {
        self.client.get(url)
    }
}
