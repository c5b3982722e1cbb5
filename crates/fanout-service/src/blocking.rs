use fanout_core::{ChatMessage, RemoteCallError};
use tokio::runtime::{Builder, Runtime};

use crate::CompletionClient;

/// Blocking wrapper around any async `CompletionClient`.
///
/// Owns a current-thread tokio runtime and uses `block_on()` for each call.
/// Designed for sync callers; calling it from inside a tokio runtime panics.
pub struct BlockingClient<C> {
    inner: C,
    rt: Runtime,
}

impl<C: CompletionClient> BlockingClient<C> {
    pub fn new(inner: C) -> std::io::Result<Self> {
        let rt = Builder::new_current_thread().enable_all().build()?;
        Ok(Self { inner, rt })
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn complete(
        &self,
        messages: &[ChatMessage],
        model: &str,
    ) -> Result<String, RemoteCallError> {
        self.rt.block_on(self.inner.complete(messages, model))
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}
