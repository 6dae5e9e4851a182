use anyhow::Result;
use clap::Parser;
use crawler::{CrawlConfig, CrawlSession, HttpTransport};
use nhs_core::persist::save_dataset;
use nhs_core::{DEFAULT_DATASET_FILE, HUB_URL};
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "crawler")]
#[command(about = "Scrape the NHS conditions pages into a JSON dataset")]
struct Cli {
    /// Output JSON file path
    #[arg(default_value = DEFAULT_DATASET_FILE)]
    output: String,
    /// Page the crawl starts from
    #[arg(long, default_value = HUB_URL)]
    root_url: String,
    /// Base stagger delay between sibling requests, in milliseconds
    #[arg(long, default_value_t = 2000)]
    delay_ms: u64,
    /// Request timeout seconds (0 disables the timeout)
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
    /// User-Agent header sent with every request
    #[arg(long, default_value = "load-nhs-data")]
    user_agent: String,
}

impl From<Cli> for CrawlConfig {
    fn from(args: Cli) -> Self {
        CrawlConfig {
            root_url: args.root_url,
            base_delay: Duration::from_millis(args.delay_ms),
            timeout: (args.timeout_secs > 0).then(|| Duration::from_secs(args.timeout_secs)),
            user_agent: args.user_agent,
            output: args.output,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let config = CrawlConfig::from(Cli::parse());
    tracing::info!(root = %config.root_url, output = %config.output, "starting to scrape the NHS conditions pages");

    let transport = HttpTransport::new(&config)?;
    let report = CrawlSession::new(transport, &config).crawl().await;

    if let Err(err) = save_dataset(&config.output, &report.dataset) {
        tracing::error!(%err, "unable to write dataset");
        return Err(err.into());
    }
    tracing::info!(output = %config.output, conditions = report.dataset.len(), "wrote output");
    Ok(())
}
