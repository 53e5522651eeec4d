use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use thread_export::config::Config;
use thread_export::pipeline;

/// Convert a Discourse forum thread to a PDF or JSON document.
///
/// Forum, batch size, output format and directory are read from the
/// environment (FORUM_BASE_URL, BATCH_SIZE, REQUEST_TIMEOUT_SECS,
/// OUTPUT_FORMAT, OUTPUT_DIR, ON_BATCH_FAILURE) or a .env file.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// The thread ID from the forum URL (e.g. '222373')
    thread_id: String,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Load .env file if present
    let _ = dotenvy::dotenv();

    init_tracing()?;

    let config = Config::from_env(cli.thread_id).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!(
        thread_id = %config.thread_id,
        base_url = %config.base_url,
        format = config.output_format.extension(),
        "Configuration loaded"
    );

    let summary = pipeline::run(&config).await?;

    if summary.failed_batches.is_empty() {
        info!(posts = summary.fetched, "Export complete");
    } else {
        warn!(
            posts = summary.fetched,
            listed = summary.requested,
            failed_batches = summary.failed_batches.len(),
            "Export complete with missing batches"
        );
    }

    println!("Thread content saved to {}", summary.output_path.display());

    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,thread_export=debug"));

    // Check if JSON logging is requested
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| matches!(v.to_lowercase().as_str(), "json" | "structured"))
        .unwrap_or(false);

    if use_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    }

    Ok(())
}
