use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::RunError;
use crate::strategy::Strategy;

/// Counts model tokens in a piece of generated text.
///
/// Implementations must be deterministic for a given `(text, model)` pair.
pub trait TokenCounter: Send + Sync {
    fn count_tokens(&self, text: &str, model: &str) -> usize;
}

/// A successful, timed run of one strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionOutcome {
    pub id: String,
    pub prompt: String,
    pub response_text: String,
    pub model: String,
    pub elapsed_seconds: f64,
    pub strategy: Strategy,
    pub started_at: DateTime<Utc>,
    tokens_per_second: f64,
}

impl CompletionOutcome {
    /// Build an outcome, deriving throughput from `counter`.
    ///
    /// Rejects a zero (or otherwise non-positive) elapsed interval.
    pub fn new(
        prompt: impl Into<String>,
        response_text: impl Into<String>,
        model: impl Into<String>,
        elapsed: Duration,
        strategy: Strategy,
        started_at: DateTime<Utc>,
        counter: &dyn TokenCounter,
    ) -> Result<Self, RunError> {
        Self::from_seconds(
            prompt,
            response_text,
            model,
            elapsed.as_secs_f64(),
            strategy,
            started_at,
            counter,
        )
    }

    pub fn from_seconds(
        prompt: impl Into<String>,
        response_text: impl Into<String>,
        model: impl Into<String>,
        elapsed_seconds: f64,
        strategy: Strategy,
        started_at: DateTime<Utc>,
        counter: &dyn TokenCounter,
    ) -> Result<Self, RunError> {
        if !elapsed_seconds.is_finite() || elapsed_seconds <= 0.0 {
            return Err(RunError::InvalidMeasurement(format!(
                "elapsed time must be positive, got {elapsed_seconds}s"
            )));
        }

        let response_text = response_text.into();
        let model = model.into();
        let tokens = counter.count_tokens(&response_text, &model);

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            prompt: prompt.into(),
            response_text,
            model,
            elapsed_seconds,
            strategy,
            started_at,
            tokens_per_second: tokens as f64 / elapsed_seconds,
        })
    }

    pub fn tokens_per_second(&self) -> f64 {
        self.tokens_per_second
    }
}

/// Outcomes collected across repeated trials, in the order they completed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RunBatch {
    outcomes: Vec<CompletionOutcome>,
}

impl RunBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outcome: CompletionOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompletionOutcome> {
        self.outcomes.iter()
    }

    /// Outcomes of one strategy, in batch order.
    pub fn by_strategy(&self, strategy: Strategy) -> impl Iterator<Item = &CompletionOutcome> {
        self.outcomes.iter().filter(move |o| o.strategy == strategy)
    }
}
