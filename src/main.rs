//! DocSend downloader - Entry point

use clap::Parser;
use docsend_dl::{Credentials, DownloadConfig, Downloader, OutputFormat};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Download a DocSend document as a linked PDF or a directory of page images
#[derive(Parser)]
#[command(name = "docsend")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Document URL or id
    url: String,

    /// Email address to submit when the document is gated
    #[arg(short, long)]
    email: Option<String>,

    /// Passcode for passcode-protected documents
    #[arg(short, long, requires = "email")]
    passcode: Option<String>,

    /// Output file (pdf) or directory (png); defaults to the document id
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format: pdf or png
    #[arg(short, long, default_value = "pdf")]
    format: OutputFormat,

    /// Maximum number of pages fetched at once
    #[arg(short, long, default_value_t = DownloadConfig::default().concurrency)]
    jobs: usize,

    /// Per-request timeout in seconds (no timeout when omitted)
    #[arg(long)]
    timeout: Option<u64>,

    /// Document-service host
    #[arg(long, default_value = docsend_dl::config::DEFAULT_HOST)]
    host: String,

    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = match cli.verbose {
        0 => "docsend_dl=info",
        1 => "docsend_dl=debug",
        _ => "docsend_dl=trace",
    };

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = DownloadConfig {
        host: cli.host,
        concurrency: cli.jobs,
        request_timeout: cli.timeout.map(Duration::from_secs),
        ..DownloadConfig::default()
    };

    let credentials = cli
        .email
        .map(|email| Credentials::new(email, cli.passcode));

    let path = Downloader::new(config)
        .download(
            &cli.url,
            credentials.as_ref(),
            cli.format,
            cli.output.as_deref(),
        )
        .await?;

    tracing::info!(path = %path.display(), "Done");
    Ok(())
}
