use clap::Parser;
use eba_publications::session::webdriver::BrowserOptions;
use eba_publications::{
    Collector, CollectorConfig, DocumentRecord, RunOutcome, SnapshotSession, WebDriverSession,
};

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match CollectorConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                ::log::error!("Failed to load config {}: {}", path.display(), e);
                std::process::exit(2);
            }
        },
        None => CollectorConfig::default(),
    };
    let config = args.apply(config.apply_env());

    let documents = match &args.snapshot {
        Some(path) => run_snapshot(path, config).await,
        None => run_webdriver(&args, config).await,
    };

    match serde_json::to_string_pretty(&documents) {
        Ok(json) => println!("{}", json),
        Err(e) => ::log::error!("Failed to serialize documents: {}", e),
    }
}

/// Runs the collector against a saved listing page
async fn run_snapshot(path: &std::path::Path, config: CollectorConfig) -> Vec<DocumentRecord> {
    let html = match std::fs::read_to_string(path) {
        Ok(html) => html,
        Err(e) => {
            ::log::error!("Failed to read snapshot {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    let session = SnapshotSession::new().with_page(&config.listing_url, html);
    let mut collector = Collector::new(session, config);
    collect(&mut collector).await
}

/// Runs the collector in a browser driven through WebDriver
async fn run_webdriver(args: &Args, config: CollectorConfig) -> Vec<DocumentRecord> {
    eprintln!("Note: collecting requires a WebDriver server (e.g., ChromeDriver).");
    eprintln!(
        "Set WEBDRIVER_URL environment variable if not using the default http://localhost:4444"
    );

    let options = BrowserOptions {
        headless: !args.headed,
        ..BrowserOptions::default()
    };
    let session = match WebDriverSession::connect(&config.webdriver_url, &options).await {
        Ok(session) => session,
        Err(e) => {
            ::log::error!("Failed to start browser session: {}", e);
            return Vec::new();
        }
    };

    let mut collector = Collector::new(session, config);
    let documents = collect(&mut collector).await;

    if let Err(e) = collector.into_session().close().await {
        ::log::warn!("Failed to close browser session: {}", e);
    }
    documents
}

async fn collect<S>(collector: &mut Collector<S>) -> Vec<DocumentRecord>
where
    S: eba_publications::BrowserSession,
{
    let start_time = std::time::Instant::now();
    let report = collector.run_with_outcome().await;

    if let RunOutcome::StopFatal(e) = &report.outcome {
        ::log::warn!("Collection ended early: {}", e);
    }
    ::log::info!(
        "Collected {} documents in {:.2} seconds",
        report.documents.len(),
        start_time.elapsed().as_secs_f64()
    );
    report.documents
}
