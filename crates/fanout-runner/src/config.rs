use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::dispatcher::DispatchOptions;
use crate::orchestrator::RunOptions;

pub const DEFAULT_PROMPT: &str = "Articulate ten principles of good software engineering.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Summary table of tokens per second by strategy
    Table,
    /// Every outcome as a JSON array
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "fanout",
    about = "Compare skeleton-then-expand generation against a single completion call"
)]
pub struct RunnerConfig {
    /// Question to answer
    #[arg(long, env = "FANOUT_PROMPT", default_value = DEFAULT_PROMPT)]
    pub prompt: String,

    /// Number of trials per strategy
    #[arg(long, default_value = "5")]
    pub iterations: usize,

    /// Model identifier passed to the completion service
    #[arg(long, env = "FANOUT_MODEL", default_value = "gpt-3.5-turbo")]
    pub model: String,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, env = "OPENAI_BASE_URL", default_value = "https://api.openai.com/v1")]
    pub base_url: String,

    /// API key sent as a bearer token
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Maximum expansion calls in flight at once (unbounded if unset)
    #[arg(long, env = "FANOUT_MAX_CONCURRENT_EXPANSIONS")]
    pub max_concurrent_expansions: Option<usize>,

    /// Drop pending expansions as soon as one fails.
    /// The dropped points are reported as cancelled in the run's failure.
    #[arg(long)]
    pub cancel_on_failure: bool,

    /// Per-request timeout (seconds)
    #[arg(long, env = "FANOUT_REQUEST_TIMEOUT", default_value = "120")]
    pub request_timeout: u64,

    /// Text placed between expanded points in the merged answer
    #[arg(long, default_value = "\n")]
    pub separator: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Skip the service reachability check before the first run
    #[arg(long)]
    pub skip_health_check: bool,
}

impl RunnerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn dispatch_options(&self) -> DispatchOptions {
        DispatchOptions {
            max_concurrent_expansions: self.max_concurrent_expansions,
            cancel_on_failure: self.cancel_on_failure,
        }
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            dispatch: self.dispatch_options(),
            separator: self.separator.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RunnerConfig::parse_from(["fanout"]);
        assert_eq!(config.iterations, 5);
        assert_eq!(config.separator, "\n");
        assert_eq!(config.output, OutputFormat::Table);
        assert!(!config.cancel_on_failure);
        assert!(!config.skip_health_check);
        assert_eq!(config.request_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn dispatch_options_from_flags() {
        let config = RunnerConfig::parse_from([
            "fanout",
            "--max-concurrent-expansions",
            "3",
            "--cancel-on-failure",
        ]);
        assert_eq!(
            config.dispatch_options(),
            DispatchOptions {
                max_concurrent_expansions: Some(3),
                cancel_on_failure: true,
            }
        );
    }

    #[test]
    fn run_options_carry_separator() {
        let config = RunnerConfig::parse_from([
            "fanout",
            "--prompt",
            "Why?",
            "--separator",
            " ",
            "--output",
            "json",
        ]);
        let options = config.run_options();
        assert_eq!(options.separator, " ");
        assert_eq!(config.prompt, "Why?");
        assert_eq!(config.output, OutputFormat::Json);
    }
}
