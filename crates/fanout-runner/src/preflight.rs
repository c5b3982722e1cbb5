use anyhow::{bail, Context, Result};
use fanout_service::OpenAiClient;
use tokio::sync::Semaphore;
use tracing::info;

use crate::config::RunnerConfig;

/// Run all preflight checks before the first trial.
pub async fn run_all(config: &RunnerConfig, client: &OpenAiClient) -> Result<()> {
    check_config(config)?;
    if config.skip_health_check {
        info!("service: health check skipped");
    } else {
        check_service(client).await?;
    }
    info!("all preflight checks passed");
    Ok(())
}

/// Reject settings that would make every run fail or hang.
pub fn check_config(config: &RunnerConfig) -> Result<()> {
    if config.iterations == 0 {
        bail!("--iterations must be at least 1");
    }
    if config.prompt.trim().is_empty() {
        bail!("--prompt must not be empty");
    }
    if config.model.trim().is_empty() {
        bail!("--model must not be empty");
    }
    match config.max_concurrent_expansions {
        Some(0) => bail!("--max-concurrent-expansions must be at least 1"),
        Some(n) if n > Semaphore::MAX_PERMITS => bail!(
            "--max-concurrent-expansions must be at most {}",
            Semaphore::MAX_PERMITS
        ),
        _ => {}
    }
    if config.api_key.as_deref().map_or(true, |k| k.trim().is_empty()) {
        bail!("no API key configured. Set OPENAI_API_KEY or pass --api-key");
    }
    Ok(())
}

async fn check_service(client: &OpenAiClient) -> Result<()> {
    client
        .health_check()
        .await
        .with_context(|| format!("completion service at {} is not usable", client.base_url()))?;
    info!("service: reachable");
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn config(args: &[&str]) -> RunnerConfig {
        let mut argv = vec!["fanout", "--api-key", "sk-test"];
        argv.extend_from_slice(args);
        RunnerConfig::parse_from(argv)
    }

    #[test]
    fn defaults_pass() {
        check_config(&config(&[])).unwrap();
    }

    #[test]
    fn zero_iterations_rejected() {
        let err = check_config(&config(&["--iterations", "0"])).unwrap_err();
        assert!(err.to_string().contains("--iterations"));
    }

    #[test]
    fn blank_prompt_rejected() {
        assert!(check_config(&config(&["--prompt", "   "])).is_err());
    }

    #[test]
    fn blank_model_rejected() {
        assert!(check_config(&config(&["--model", ""])).is_err());
    }

    #[test]
    fn zero_concurrency_cap_rejected() {
        let err = check_config(&config(&["--max-concurrent-expansions", "0"])).unwrap_err();
        assert!(err.to_string().contains("--max-concurrent-expansions"));
    }

    #[test]
    fn oversized_concurrency_cap_rejected() {
        let max = usize::MAX.to_string();
        let err = check_config(&config(&["--max-concurrent-expansions", &max])).unwrap_err();
        assert!(err.to_string().contains("at most"));

        let limit = Semaphore::MAX_PERMITS.to_string();
        check_config(&config(&["--max-concurrent-expansions", &limit])).unwrap();
    }

    #[test]
    fn blank_api_key_rejected() {
        let mut cfg = config(&[]);
        cfg.api_key = Some(" ".into());
        assert!(check_config(&cfg).is_err());
        cfg.api_key = None;
        let err = check_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[tokio::test]
    async fn skipped_health_check_makes_no_request() {
        // Nothing listens on this address; the check must not be attempted.
        let client = OpenAiClient::new("http://127.0.0.1:9");
        run_all(&config(&["--skip-health-check"]), &client)
            .await
            .unwrap();
    }
}
