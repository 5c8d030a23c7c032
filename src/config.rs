use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Listing page enumerating the EBA publications
pub const LISTING_URL: &str = "https://www.abe-eba.eu/publications/";

/// Configuration for the publications collector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Page holding the publication entries
    #[serde(default = "default_listing_url")]
    pub listing_url: String,

    /// Maximum number of documents collected in one run (unbounded if None)
    #[serde(default)]
    pub max_documents: Option<usize>,

    /// How long to wait for the publication entries to appear
    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,

    /// Pause after navigation so scripts can render the page
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// How long the cookie banner button gets to become clickable
    #[serde(default = "default_cookie_wait_secs")]
    pub cookie_wait_secs: u64,

    /// Whether to download linked PDFs and extract their text
    #[serde(default)]
    pub extract_text: bool,

    /// URL suffixes that mark a link as a document file
    #[serde(default = "default_document_suffixes")]
    pub document_suffixes: Vec<String>,

    /// User-Agent sent when downloading documents
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,
}

impl CollectorConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Override the WebDriver URL with the WEBDRIVER_URL environment variable if set
    pub fn apply_env(mut self) -> Self {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
        self
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn cookie_wait(&self) -> Duration {
        Duration::from_secs(self.cookie_wait_secs)
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            listing_url: default_listing_url(),
            max_documents: None,
            wait_timeout_secs: default_wait_timeout_secs(),
            settle_delay_ms: default_settle_delay_ms(),
            cookie_wait_secs: default_cookie_wait_secs(),
            extract_text: false,
            document_suffixes: default_document_suffixes(),
            user_agent: default_user_agent(),
            webdriver_url: default_webdriver_url(),
        }
    }
}

fn default_listing_url() -> String {
    LISTING_URL.to_string()
}

fn default_wait_timeout_secs() -> u64 {
    20
}

fn default_settle_delay_ms() -> u64 {
    2000
}

fn default_cookie_wait_secs() -> u64 {
    5
}

fn default_document_suffixes() -> Vec<String> {
    vec![".pdf".to_string()]
}

/// Desktop Firefox, some hosts refuse the default client string
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:120.0) Gecko/20100101 Firefox/120.0".to_string()
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_from_empty_json() {
        let config = CollectorConfig::from_json("{}").unwrap();
        assert_eq!(config.listing_url, LISTING_URL);
        assert_eq!(config.max_documents, None);
        assert_eq!(config.wait_timeout(), Duration::from_secs(20));
        assert_eq!(config.settle_delay(), Duration::from_millis(2000));
        assert_eq!(config.cookie_wait(), Duration::from_secs(5));
        assert!(!config.extract_text);
        assert_eq!(config.document_suffixes, vec![".pdf".to_string()]);
        assert!(config.user_agent.contains("Firefox/120.0"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"max_documents": 4, "extract_text": true, "wait_timeout_secs": 3}}"#
        )
        .unwrap();

        let config = CollectorConfig::from_file(file.path()).unwrap();
        assert_eq!(config.max_documents, Some(4));
        assert!(config.extract_text);
        assert_eq!(config.wait_timeout(), Duration::from_secs(3));
        assert_eq!(config.webdriver_url, "http://localhost:4444");
    }

    #[test]
    fn test_invalid_json() {
        let err = CollectorConfig::from_json(r#"{"max_documents": "four"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));

        let err = CollectorConfig::from_file("/nonexistent/eba.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
