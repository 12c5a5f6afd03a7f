//! Configuration management.
//!
//! Every setting has a built-in default, so running with no configuration at
//! all reproduces the stock sweep. A TOML file and `SCHOLAR_SWEEP__*`
//! environment variables can override individual values:
//!
//! ```toml
//! year_from = 2024
//! max_per_keyword = 3
//! source = "google_scholar"
//! keywords = ["voice agent", "speech-to-speech"]
//!
//! [delays]
//! record_secs = 3
//! record_error_secs = 5
//! keyword_secs = 5
//! keyword_error_secs = 10
//!
//! [http]
//! timeout_secs = 30
//! connect_timeout_secs = 10
//! proxy = "socks5://127.0.0.1:9050"
//! ```
//!
//! ```bash
//! export SCHOLAR_SWEEP__DELAYS__RECORD_SECS=1
//! export SCHOLAR_SWEEP__KEYWORDS="voice agent,neural codec"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "SCHOLAR_SWEEP";

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "scholar-sweep.toml";

/// Topics swept when no keyword list is configured
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "voice agent",
    "conversational AI",
    "speech dialogue",
    "full-duplex speech",
    "speech-to-speech",
    "PersonaPlex",
    "GPT-4o voice",
    "Gemini voice",
    "voice cloning",
    "zero-shot TTS",
    "neural codec",
];

pub const DEFAULT_YEAR_FROM: i32 = 2024;
pub const DEFAULT_MAX_PER_KEYWORD: usize = 3;
pub const DEFAULT_SOURCE: &str = "google_scholar";

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Settings for one sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Keywords to sweep, in order
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,

    /// Minimum publication year (inclusive)
    #[serde(default = "default_year_from")]
    pub year_from: i32,

    /// Maximum number of pulls per keyword
    #[serde(default = "default_max_per_keyword")]
    pub max_per_keyword: usize,

    /// Source identifier (see `SourceRegistry`)
    #[serde(default = "default_source")]
    pub source: String,

    #[serde(default)]
    pub delays: DelayConfig,

    #[serde(default)]
    pub http: HttpConfig,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            keywords: default_keywords(),
            year_from: DEFAULT_YEAR_FROM,
            max_per_keyword: DEFAULT_MAX_PER_KEYWORD,
            source: default_source(),
            delays: DelayConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

impl SweepConfig {
    /// Reject settings no sweep can run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.trim().is_empty() {
            return Err(ConfigError::Invalid("source must not be empty".to_string()));
        }
        if self.keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(ConfigError::Invalid("keywords must not be blank".to_string()));
        }
        Ok(())
    }
}

fn default_keywords() -> Vec<String> {
    DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect()
}

fn default_year_from() -> i32 {
    DEFAULT_YEAR_FROM
}

fn default_max_per_keyword() -> usize {
    DEFAULT_MAX_PER_KEYWORD
}

fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}

/// Fixed politeness delays, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayConfig {
    /// After every processed record
    #[serde(default = "default_record_secs")]
    pub record_secs: u64,

    /// After a failed pull
    #[serde(default = "default_record_error_secs")]
    pub record_error_secs: u64,

    /// After finishing a keyword
    #[serde(default = "default_keyword_secs")]
    pub keyword_secs: u64,

    /// After a keyword whose search could not be opened
    #[serde(default = "default_keyword_error_secs")]
    pub keyword_error_secs: u64,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            record_secs: default_record_secs(),
            record_error_secs: default_record_error_secs(),
            keyword_secs: default_keyword_secs(),
            keyword_error_secs: default_keyword_error_secs(),
        }
    }
}

impl DelayConfig {
    /// No delays at all
    pub fn none() -> Self {
        Self {
            record_secs: 0,
            record_error_secs: 0,
            keyword_secs: 0,
            keyword_error_secs: 0,
        }
    }

    pub fn record(&self) -> Duration {
        Duration::from_secs(self.record_secs)
    }

    pub fn record_error(&self) -> Duration {
        Duration::from_secs(self.record_error_secs)
    }

    pub fn keyword(&self) -> Duration {
        Duration::from_secs(self.keyword_secs)
    }

    pub fn keyword_error(&self) -> Duration {
        Duration::from_secs(self.keyword_error_secs)
    }
}

fn default_record_secs() -> u64 {
    3
}

fn default_record_error_secs() -> u64 {
    5
}

fn default_keyword_secs() -> u64 {
    5
}

fn default_keyword_error_secs() -> u64 {
    10
}

/// HTTP client settings shared by all network sources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Proxy URL applied to all requests (http, https or socks5)
    #[serde(default)]
    pub proxy: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
            proxy: None,
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

/// Load configuration from an optional file plus environment overrides
pub fn load_config(path: Option<&Path>) -> Result<SweepConfig, ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("keywords"),
        )
        .build()?;

    let sweep: SweepConfig = settings.try_deserialize()?;
    sweep.validate()?;
    Ok(sweep)
}

/// Find a configuration file in the default locations
///
/// Checks `./scholar-sweep.toml`, then `<config dir>/scholar-sweep/config.toml`.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("scholar-sweep").join("config.toml"))
        .filter(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    // load_config reads the process environment, which the env override
    // test mutates.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_config() {
        let config = SweepConfig::default();
        assert_eq!(config.year_from, 2024);
        assert_eq!(config.max_per_keyword, 3);
        assert_eq!(config.source, "google_scholar");
        assert_eq!(config.keywords.len(), DEFAULT_KEYWORDS.len());
        assert_eq!(config.keywords[0], "voice agent");
        assert_eq!(config.delays.record(), Duration::from_secs(3));
        assert_eq!(config.delays.record_error(), Duration::from_secs(5));
        assert_eq!(config.delays.keyword(), Duration::from_secs(5));
        assert_eq!(config.delays.keyword_error(), Duration::from_secs(10));
        assert!(config.http.proxy.is_none());
    }

    #[test]
    fn test_load_config_file() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
year_from = 2023
keywords = ["neural codec"]

[delays]
record_secs = 1

[http]
timeout_secs = 5
"#
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.year_from, 2023);
        assert_eq!(config.keywords, vec!["neural codec".to_string()]);
        assert_eq!(config.delays.record_secs, 1);
        assert_eq!(config.delays.keyword_secs, 5);
        assert_eq!(config.http.timeout_secs, 5);
        assert_eq!(config.max_per_keyword, 3);
    }

    #[test]
    fn test_env_overrides_file() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
year_from = 2023
keywords = ["speech dialogue"]

[delays]
record_secs = 1
keyword_secs = 7
"#
        )
        .unwrap();

        std::env::set_var("SCHOLAR_SWEEP__KEYWORDS", "voice agent,neural codec");
        std::env::set_var("SCHOLAR_SWEEP__DELAYS__RECORD_SECS", "0");
        std::env::set_var("SCHOLAR_SWEEP__YEAR_FROM", "2026");

        let result = load_config(Some(file.path()));

        std::env::remove_var("SCHOLAR_SWEEP__KEYWORDS");
        std::env::remove_var("SCHOLAR_SWEEP__DELAYS__RECORD_SECS");
        std::env::remove_var("SCHOLAR_SWEEP__YEAR_FROM");

        let config = result.unwrap();
        assert_eq!(
            config.keywords,
            vec!["voice agent".to_string(), "neural codec".to_string()]
        );
        assert_eq!(config.year_from, 2026);
        assert_eq!(config.delays.record_secs, 0);
        assert_eq!(config.delays.keyword_secs, 7);
        assert_eq!(config.max_per_keyword, 3);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let result = load_config(Some(Path::new("/nonexistent/scholar-sweep.toml")));
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn test_blank_keyword_rejected() {
        let config = SweepConfig {
            keywords: vec!["voice agent".to_string(), "  ".to_string()],
            ..SweepConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
