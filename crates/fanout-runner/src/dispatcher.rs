use std::collections::HashSet;

use fanout_core::{ExpansionResult, RemoteCallError, SubtaskDescriptor};
use fanout_service::CompletionClient;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::expander;

/// Concurrency controls for one fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOptions {
    /// Upper bound on expansion calls in flight. `None` starts them all at once.
    pub max_concurrent_expansions: Option<usize>,
    /// Stop waiting on siblings after the first failure. Expansions still in
    /// flight are dropped and reported as `RemoteCallError::Cancelled`.
    pub cancel_on_failure: bool,
}

/// Expand every point concurrently and wait for all of them.
///
/// Returns one result per descriptor, sorted by ordinal. A failed expansion
/// never cancels its siblings unless `cancel_on_failure` is set.
pub async fn dispatch(
    client: &dyn CompletionClient,
    descriptors: &[SubtaskDescriptor],
    prompt: &str,
    skeleton: &str,
    model: &str,
    options: &DispatchOptions,
) -> Vec<ExpansionResult> {
    if descriptors.is_empty() {
        return Vec::new();
    }

    let total = descriptors.len();
    let limiter = options
        .max_concurrent_expansions
        .map(|n| Semaphore::new(n.clamp(1, Semaphore::MAX_PERMITS)));
    let limiter = limiter.as_ref();

    let mut pending: FuturesUnordered<_> = descriptors
        .iter()
        .map(|point| async move {
            // Acquire permit (waits while the cap is reached)
            let _permit = match limiter {
                Some(sem) => sem.acquire().await.ok(),
                None => None,
            };
            let result = expander::expand(client, point, prompt, skeleton, model).await;
            (point.ordinal, result)
        })
        .collect();

    debug!("dispatched {total} expansions");

    // Collect results as they complete
    let mut results = Vec::with_capacity(total);
    while let Some((ordinal, result)) = pending.next().await {
        match result {
            Ok(text) => {
                debug!(ordinal, "expansion complete ({}/{total})", results.len() + 1);
                results.push(ExpansionResult::success(ordinal, text));
            }
            Err(e) => {
                warn!("{e}");
                results.push(ExpansionResult::failure(ordinal, e.source));
                if options.cancel_on_failure {
                    break;
                }
            }
        }
    }
    drop(pending);

    if results.len() < total {
        let finished: HashSet<usize> = results.iter().map(|r| r.ordinal).collect();
        let cancelled: Vec<usize> = descriptors
            .iter()
            .map(|d| d.ordinal)
            .filter(|o| !finished.contains(o))
            .collect();
        warn!("cancelled {} pending expansions: {cancelled:?}", cancelled.len());
        results.extend(
            cancelled
                .into_iter()
                .map(|o| ExpansionResult::failure(o, RemoteCallError::Cancelled)),
        );
    }

    results.sort_by_key(|r| r.ordinal);
    results
}
