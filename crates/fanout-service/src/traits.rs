use async_trait::async_trait;
use fanout_core::{ChatMessage, RemoteCallError};

/// A remote text-generation service.
///
/// Implementations must tolerate many concurrent `complete` calls on one
/// shared instance. The orchestrator never serializes access.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Human-readable client name for logging.
    fn name(&self) -> &str;

    /// Generate a reply to `messages` with `model`.
    async fn complete(&self, messages: &[ChatMessage], model: &str)
        -> Result<String, RemoteCallError>;
}
