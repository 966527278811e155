use anyhow::{Context, Result};
use clap::Parser;
use good_job::app_log;
use good_job::cli::{self, Cli};
use std::fs::OpenOptions;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LOG_FILE: &str = "/tmp/good-job.log";

#[tokio::main]
async fn main() -> Result<()> {
    // Terminal output belongs to the command; logs go to a file
    let log_path =
        std::env::var("GOOD_JOB_LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true) // Clear file on startup
        .open(&log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(file)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    app_log!(info, "Starting goodjob {}", cli.portal.portal().display_name());

    let result = cli::run(cli).await;
    if let Err(e) = &result {
        app_log!(error, "Command failed: {:#}", e);
    }
    result
}
