//! One scrape pass over the EBA publications listing.
//!
//! The [`Collector`] opens the listing page, reads every publication entry
//! in page order and turns each linked document file into a
//! [`DocumentRecord`]. Stop conditions and errors end the pass early; the
//! records gathered until then are always returned.

mod entry;
pub mod plugin;


pub use entry::{EntryFields, read_entry};
pub use plugin::SourcePlugin;

use crate::config::CollectorConfig;
use crate::document::DocumentRecord;
use crate::error::{CollectError, SessionError};
use crate::extract::{PdfTextExtractor, TextExtractor};
use crate::filter::DocumentLinkFilter;
use crate::logging::SourceLogger;
use crate::parsers::text::{non_empty, normalize_document_text};
use crate::session::{BrowserSession, Condition, Locator};
use async_trait::async_trait;

/// Name of the source, also the log target of its collector
pub const SOURCE_NAME: &str = "eba";

/// Present on the page once the publications are rendered
const PUBLICATION_MARKER: &str = ".publication";
const PUBLICATION_ENTRY: &str = "article.publication";
const COOKIE_ACCEPT_BUTTON_ID: &str = "onetrust-accept-btn-handler";

/// Result of offering a record to the collector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Record kept, keep scraping
    Continue,
    /// Maximum number of documents already collected
    StopQuota,
    /// Record is the last document of a previous run
    StopDuplicate,
}

/// Why a pass ended
#[derive(Debug)]
pub enum RunOutcome {
    /// Every entry of the page was processed
    Completed,
    StopQuota,
    StopDuplicate,
    /// The page could not be read; records before the failure are kept
    StopFatal(CollectError),
}

/// Documents of one pass together with the reason it ended
#[derive(Debug)]
pub struct RunReport {
    pub documents: Vec<DocumentRecord>,
    pub outcome: RunOutcome,
}

/// Collects document records from the publications listing page
pub struct Collector<S, X = PdfTextExtractor> {
    session: S,
    extractor: X,
    config: CollectorConfig,
    last_document: Option<DocumentRecord>,
    logger: SourceLogger,
    documents: Vec<DocumentRecord>,
}

impl<S: BrowserSession> Collector<S, PdfTextExtractor> {
    /// Create a collector downloading PDFs over HTTP
    pub fn new(session: S, config: CollectorConfig) -> Self {
        let extractor = PdfTextExtractor::new(config.user_agent.clone());
        Self::with_extractor(session, extractor, config)
    }
}

impl<S: BrowserSession, X: TextExtractor> Collector<S, X> {
    /// Create a collector with a custom text extractor
    pub fn with_extractor(session: S, extractor: X, config: CollectorConfig) -> Self {
        Self {
            session,
            extractor,
            config,
            last_document: None,
            logger: SourceLogger::new(SOURCE_NAME),
            documents: Vec::new(),
        }
    }

    /// Stop the pass when this document (from an earlier run) shows up again
    pub fn with_last_document(mut self, document: DocumentRecord) -> Self {
        self.last_document = Some(document);
        self
    }

    /// Send log records to this logger instead of the global one
    pub fn with_logger(mut self, logger: SourceLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    /// Give back the browser session, e.g. to close it
    pub fn into_session(self) -> S {
        self.session
    }

    /// Runs one pass and returns the documents found, possibly partial
    pub async fn run(&mut self) -> Vec<DocumentRecord> {
        self.run_with_outcome().await.documents
    }

    /// Runs one pass and reports why it ended
    pub async fn run_with_outcome(&mut self) -> RunReport {
        self.logger.info(format_args!("Set source: {}", SOURCE_NAME));
        self.logger.debug(format_args!("Parse process start"));
        self.documents.clear();

        let outcome = match self.pass().await {
            Ok(outcome) => outcome,
            Err(e) => RunOutcome::StopFatal(e),
        };

        match &outcome {
            RunOutcome::Completed => self.logger.debug(format_args!("Parse process finished")),
            RunOutcome::StopQuota => self.logger.debug(format_args!(
                "Parsing stopped: max count of documents reached ({})",
                self.documents.len()
            )),
            RunOutcome::StopDuplicate => self.logger.debug(format_args!(
                "Parsing stopped: reached already existing document"
            )),
            RunOutcome::StopFatal(e) => {
                self.logger.debug(format_args!("Parsing stopped with error: {}", e))
            }
        }

        RunReport {
            documents: std::mem::take(&mut self.documents),
            outcome,
        }
    }

    /// Offers a record to the result list, checking the stop conditions first
    pub fn submit(&mut self, document: DocumentRecord) -> SubmitOutcome {
        if let Some(last) = &self.last_document {
            if last.hash() == document.hash() {
                self.logger.info(format_args!(
                    "Found already existing document ({})",
                    last.web_link
                ));
                return SubmitOutcome::StopDuplicate;
            }
        }

        if let Some(max) = self.config.max_documents {
            if self.documents.len() >= max {
                return SubmitOutcome::StopQuota;
            }
        }

        self.logger.info(format_args!("{}", document.summary()));
        self.documents.push(document);
        SubmitOutcome::Continue
    }

    async fn pass(&mut self) -> Result<RunOutcome, CollectError> {
        let url = self.config.listing_url.clone();
        let filter = DocumentLinkFilter::new(&url, &self.config.document_suffixes)?;

        self.open_listing(&url).await?;

        let timeout = self.config.wait_timeout();
        let marker = Locator::css(PUBLICATION_MARKER);
        self.session
            .wait_until(Condition::Present(&marker), timeout)
            .await
            .map_err(|e| match e {
                SessionError::Timeout { .. } => CollectError::NoPublications {
                    url: url.clone(),
                    timeout,
                },
                other => CollectError::Session(other),
            })?;

        let entries = self
            .session
            .find_all(&Locator::css(PUBLICATION_ENTRY))
            .await?;
        self.logger.debug(format_args!(
            "Found {} publications on {}",
            entries.len(),
            url
        ));

        for (index, entry) in entries.iter().enumerate() {
            let fields = read_entry(&self.session, entry, index, &filter, &self.logger).await?;

            for web_link in fields.document_links(&filter) {
                let mut document = fields.to_record(web_link);
                if self.config.extract_text {
                    self.attach_text(&mut document).await;
                }

                match self.submit(document) {
                    SubmitOutcome::Continue => {}
                    SubmitOutcome::StopQuota => return Ok(RunOutcome::StopQuota),
                    SubmitOutcome::StopDuplicate => return Ok(RunOutcome::StopDuplicate),
                }
            }
        }

        Ok(RunOutcome::Completed)
    }

    /// Navigates to the listing and gets the cookie banner out of the way
    async fn open_listing(&self, url: &str) -> Result<(), CollectError> {
        self.logger.debug(format_args!("Parser enter to {}", url));
        self.session.goto(url).await?;
        self.logger.debug(format_args!("Entered on web page {}", url));

        tokio::time::sleep(self.config.settle_delay()).await;
        self.accept_cookies().await;
        Ok(())
    }

    /// Clicks the cookie consent button when there is one
    async fn accept_cookies(&self) {
        let page = self.session.current_url().await.unwrap_or_default();

        let button = match self
            .session
            .find(&Locator::id(COOKIE_ACCEPT_BUTTON_ID))
            .await
        {
            Ok(button) => button,
            Err(e) if e.is_missing() => {
                self.logger
                    .debug(format_args!("Cookie modal not found on page: {}", page));
                return;
            }
            Err(e) => {
                self.logger
                    .warn(format_args!("Cookie modal lookup failed on {}: {}", page, e));
                return;
            }
        };

        let clicked = match self
            .session
            .wait_until(Condition::Clickable(&button), self.config.cookie_wait())
            .await
        {
            Ok(()) => self.session.click(&button).await,
            Err(e) => Err(e),
        };

        match clicked {
            Ok(()) => self
                .logger
                .debug(format_args!("Parser pass cookie modal on page: {}", page)),
            Err(e) => self
                .logger
                .debug(format_args!("Cookie modal left open on {}: {}", page, e)),
        }
    }

    /// Downloads the document and stores its text; failures only get logged
    async fn attach_text(&self, document: &mut DocumentRecord) {
        match self.extractor.extract_text(&document.web_link).await {
            Ok(text) => document.text = non_empty(normalize_document_text(&text)),
            Err(e) => self.logger.debug(format_args!(
                "Text could not be extracted from document {}: {}",
                document.web_link, e
            )),
        }
    }
}

#[async_trait]
impl<S: BrowserSession, X: TextExtractor> SourcePlugin for Collector<S, X> {
    fn source_name(&self) -> &str {
        SOURCE_NAME
    }

    async fn content(&mut self) -> Vec<DocumentRecord> {
        self.run().await
    }
}
