use std::time::Duration;
use thiserror::Error;

/// Errors raised by a browser session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no element matches {0}")]
    NoSuchElement(String),

    #[error("timed out after {timeout:?} waiting for {condition}")]
    Timeout {
        condition: String,
        timeout: Duration,
    },

    #[error("failed to navigate to {url}: {reason}")]
    Navigation { url: String, reason: String },

    #[error("locator {0} is not supported by this session")]
    UnsupportedLocator(String),

    #[error("element is no longer attached to the page")]
    StaleElement,

    #[error("webdriver command failed: {0}")]
    WebDriver(#[from] fantoccini::error::CmdError),
}

impl SessionError {
    /// Whether the error only says the element is not on the page
    pub fn is_missing(&self) -> bool {
        matches!(self, SessionError::NoSuchElement(_))
    }
}

/// Errors that end a collection pass
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("browser session error: {0}")]
    Session(#[from] SessionError),

    #[error("no publications appeared on {url} within {timeout:?}")]
    NoPublications { url: String, timeout: Duration },

    #[error("publication #{index} is missing required field `{field}`: {source}")]
    MissingField {
        index: usize,
        field: &'static str,
        #[source]
        source: SessionError,
    },

    #[error("publication #{index} has an unparseable date {raw:?}")]
    InvalidDate { index: usize, raw: String },

    #[error("invalid url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Errors raised while turning a linked PDF into text
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server answered {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("not a readable PDF: {0}")]
    Parse(#[from] lopdf::Error),

    #[error("document is encrypted")]
    Encrypted,
}

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}
