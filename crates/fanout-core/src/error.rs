use std::collections::BTreeSet;

use thiserror::Error;

use crate::strategy::Stage;

/// A single call to the completion service failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteCallError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    /// The call was dropped before completing because a sibling failed.
    #[error("cancelled after a sibling expansion failed")]
    Cancelled,
}

/// An expansion call failed for the subtask at `ordinal`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expansion of subtask {ordinal} failed: {source}")]
pub struct ExpansionError {
    pub ordinal: usize,
    #[source]
    pub source: RemoteCallError,
}

/// Some expansions of a skeleton failed while others succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} of {total} subtasks failed: {failed_ordinals:?}", .failed_ordinals.len())]
pub struct PartialFailure {
    pub failed_ordinals: BTreeSet<usize>,
    pub total: usize,
}

/// Reason a run produced no `CompletionOutcome`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RunError {
    #[error("{stage} failed: {source}")]
    Remote {
        stage: Stage,
        #[source]
        source: RemoteCallError,
    },

    #[error(transparent)]
    PartialFailure(#[from] PartialFailure),

    #[error("invalid measurement: {0}")]
    InvalidMeasurement(String),
}

impl RunError {
    /// The pipeline stage the run was in when it failed.
    pub fn stage(&self) -> Stage {
        match self {
            RunError::Remote { stage, .. } => *stage,
            RunError::PartialFailure(_) => Stage::Merge,
            RunError::InvalidMeasurement(_) => Stage::Measure,
        }
    }
}
