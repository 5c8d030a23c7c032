use clap::Parser;
use eba_publications::CollectorConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "eba-publications")]
#[command(about = "Collects documents from the EBA publications listing")]
#[command(version)]
pub struct Args {
    /// JSON configuration file (defaults apply to missing fields)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// URL for the WebDriver instance (overrides config and WEBDRIVER_URL)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Maximum number of documents to collect
    #[arg(short, long)]
    pub max_documents: Option<usize>,

    /// Download linked PDFs and extract their text
    #[arg(short, long)]
    pub extract_text: bool,

    /// Seconds to wait for the publications to appear
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Replay a saved copy of the listing page instead of using a browser
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,
}

impl Args {
    /// Applies command-line overrides on top of the loaded configuration
    pub fn apply(&self, mut config: CollectorConfig) -> CollectorConfig {
        if let Some(url) = &self.webdriver_url {
            config.webdriver_url = url.clone();
        }
        if self.max_documents.is_some() {
            config.max_documents = self.max_documents;
        }
        if self.extract_text {
            config.extract_text = true;
        }
        if let Some(timeout) = self.timeout {
            config.wait_timeout_secs = timeout;
        }
        config
    }
}
