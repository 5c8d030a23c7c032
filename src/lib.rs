// Re-export modules
pub mod collector;
pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod filter;
pub mod logging;
pub mod parsers;
pub mod session;

// Re-export commonly used types for convenience
pub use collector::{Collector, RunOutcome, RunReport, SOURCE_NAME, SourcePlugin, SubmitOutcome};
pub use config::{CollectorConfig, LISTING_URL};
pub use document::{DocumentRecord, LinkPair, OtherData};
pub use error::{CollectError, ConfigError, PdfError, SessionError};
pub use extract::{PdfTextExtractor, TextExtractor};
pub use logging::SourceLogger;
pub use session::{BrowserSession, Condition, Locator, SnapshotSession, WebDriverSession};
