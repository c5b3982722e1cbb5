use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use fanout_core::TokenCounter;
use tiktoken_rs::CoreBPE;
use tracing::warn;

/// Token counter backed by tiktoken BPE tables.
///
/// Picks the encoding from the model name and falls back to `cl100k_base` for
/// unknown models. Tables are loaded once per model and cached.
#[derive(Default)]
pub struct TiktokenCounter {
    cache: Mutex<HashMap<String, Option<Arc<CoreBPE>>>>,
}

impl TiktokenCounter {
    pub fn new() -> Self {
        Self::default()
    }

    fn bpe_for(&self, model: &str) -> Option<Arc<CoreBPE>> {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(entry) = cache.get(model) {
            return entry.clone();
        }

        let bpe = match tiktoken_rs::get_bpe_from_model(model) {
            Ok(bpe) => Some(Arc::new(bpe)),
            Err(e) => {
                warn!("no tokenizer for model {model}, using cl100k_base: {e}");
                tiktoken_rs::cl100k_base().ok().map(Arc::new)
            }
        };
        cache.insert(model.to_string(), bpe.clone());
        bpe
    }
}

impl TokenCounter for TiktokenCounter {
    fn count_tokens(&self, text: &str, model: &str) -> usize {
        match self.bpe_for(model) {
            Some(bpe) => bpe.encode_ordinary(text).len(),
            // Only reachable if the bundled tables fail to load.
            None => text.split_whitespace().count(),
        }
    }
}
