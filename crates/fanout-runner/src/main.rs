use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use fanout_runner::config::{OutputFormat, RunnerConfig};
use fanout_runner::orchestrator::Orchestrator;
use fanout_runner::{preflight, report};
use fanout_service::{OpenAiClient, TiktokenCounter};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = RunnerConfig::parse();
    info!("fanout starting");
    info!("service: {}", config.base_url);
    info!("model: {}", config.model);

    let client = match &config.api_key {
        Some(key) => OpenAiClient::with_api_key(&config.base_url, key.clone()),
        None => OpenAiClient::new(&config.base_url),
    }
    .with_timeout(config.request_timeout())
    .context("failed to build HTTP client")?;

    // Run preflight checks
    preflight::run_all(&config, &client).await?;

    let orchestrator = Orchestrator::new(
        Arc::new(client),
        Arc::new(TiktokenCounter::new()),
        config.run_options(),
    );

    let batch = orchestrator
        .run_batch(&config.prompt, &config.model, config.iterations)
        .await;
    let expected = config.iterations.saturating_mul(2);
    if batch.len() < expected {
        warn!("{} of {expected} runs failed", expected - batch.len());
    }

    match config.output {
        OutputFormat::Table => print!("{}", report::render_table(&report::summarize(&batch))),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&batch)?),
    }
    Ok(())
}
