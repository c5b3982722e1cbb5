pub mod error;
pub mod message;
pub mod outcome;
pub mod strategy;
pub mod subtask;

pub use error::{ExpansionError, PartialFailure, RemoteCallError, RunError};
pub use message::{ChatMessage, Role};
pub use outcome::{CompletionOutcome, RunBatch, TokenCounter};
pub use strategy::{Stage, Strategy};
pub use subtask::{ExpansionResult, SubtaskDescriptor};
