use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use fanout_core::{CompletionOutcome, RunBatch, RunError, Stage, Strategy, TokenCounter};
use fanout_service::CompletionClient;
use tracing::{debug, error, info};

use crate::dispatcher::{self, DispatchOptions};
use crate::merger::{self, DEFAULT_SEPARATOR};
use crate::outline;

/// Knobs for the skeleton-then-expand strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub dispatch: DispatchOptions,
    pub separator: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            dispatch: DispatchOptions::default(),
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

/// Runs one strategy end to end and times it.
pub struct Orchestrator {
    client: Arc<dyn CompletionClient>,
    counter: Arc<dyn TokenCounter>,
    options: RunOptions,
}

impl Orchestrator {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        counter: Arc<dyn TokenCounter>,
        options: RunOptions,
    ) -> Self {
        Self {
            client,
            counter,
            options,
        }
    }

    /// Answer `prompt` with a single completion call.
    pub async fn run_normal(
        &self,
        prompt: &str,
        model: &str,
    ) -> Result<CompletionOutcome, RunError> {
        let messages = fanout_prompts::user_messages(prompt);

        let started_at = Utc::now();
        let start = Instant::now();
        debug!(stage = %Stage::NormalCall, "requesting completion");
        let text = self
            .client
            .complete(&messages, model)
            .await
            .map_err(|source| RunError::Remote {
                stage: Stage::NormalCall,
                source,
            })?;
        let elapsed = start.elapsed();

        debug!(stage = %Stage::Measure, "counting tokens");
        CompletionOutcome::new(
            prompt,
            text,
            model,
            elapsed,
            Strategy::Normal,
            started_at,
            self.counter.as_ref(),
        )
    }

    /// Answer `prompt` by requesting a skeleton and expanding its points concurrently.
    ///
    /// The clock covers the skeleton call, every expansion and the merge.
    pub async fn run_parallel(
        &self,
        prompt: &str,
        model: &str,
    ) -> Result<CompletionOutcome, RunError> {
        let skeleton_request =
            fanout_prompts::user_messages(&fanout_prompts::skeleton_prompt(prompt));

        let started_at = Utc::now();
        let start = Instant::now();

        debug!(stage = %Stage::SkeletonCall, "requesting skeleton");
        let skeleton = self
            .client
            .complete(&skeleton_request, model)
            .await
            .map_err(|source| RunError::Remote {
                stage: Stage::SkeletonCall,
                source,
            })?;

        debug!(stage = %Stage::Parse, "parsing skeleton");
        let points = outline::parse_outline(&skeleton);
        info!("skeleton has {} points", points.len());

        debug!(stage = %Stage::Expand, "expanding {} points", points.len());
        let results = dispatcher::dispatch(
            self.client.as_ref(),
            &points,
            prompt,
            &skeleton,
            model,
            &self.options.dispatch,
        )
        .await;

        debug!(stage = %Stage::Merge, "merging expansions");
        let text = merger::merge(&results, &self.options.separator)?;
        let elapsed = start.elapsed();

        debug!(stage = %Stage::Measure, "counting tokens");
        CompletionOutcome::new(
            prompt,
            text,
            model,
            elapsed,
            Strategy::Parallel,
            started_at,
            self.counter.as_ref(),
        )
    }

    pub async fn run(
        &self,
        strategy: Strategy,
        prompt: &str,
        model: &str,
    ) -> Result<CompletionOutcome, RunError> {
        match strategy {
            Strategy::Normal => self.run_normal(prompt, model).await,
            Strategy::Parallel => self.run_parallel(prompt, model).await,
        }
    }

    /// Run every strategy `iterations` times, parallel before normal within
    /// each iteration.
    ///
    /// A failed run is logged and skipped; the batch keeps going.
    pub async fn run_batch(&self, prompt: &str, model: &str, iterations: usize) -> RunBatch {
        let mut batch = RunBatch::new();
        for iteration in 1..=iterations {
            for strategy in [Strategy::Parallel, Strategy::Normal] {
                info!("iteration {iteration}/{iterations}: {strategy}");
                match self.run(strategy, prompt, model).await {
                    Ok(outcome) => {
                        info!(
                            "{strategy}: {:.2} tokens/s over {:.2}s",
                            outcome.tokens_per_second(),
                            outcome.elapsed_seconds
                        );
                        batch.push(outcome);
                    }
                    Err(e) => {
                        error!(stage = %e.stage(), "{strategy} run aborted: {e}");
                    }
                }
            }
        }
        batch
    }
}
