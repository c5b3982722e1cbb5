use serde::{Deserialize, Serialize};

use crate::error::RemoteCallError;

/// One point of a parsed skeleton.
///
/// `ordinal` is the only ordering signal. `label` is whatever enumerator the
/// model wrote ("1", "b", ...) and is carried for prompt phrasing only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtaskDescriptor {
    pub ordinal: usize,
    pub label: String,
    pub raw_text: String,
}

impl SubtaskDescriptor {
    /// The point text with its enumerator and delimiter removed.
    ///
    /// Falls back to the full line when the label was not taken from it.
    pub fn body(&self) -> &str {
        let Some(rest) = self.raw_text.strip_prefix(self.label.as_str()) else {
            return &self.raw_text;
        };
        match rest.strip_prefix(&['.', ')', ':'][..]) {
            Some(body) => body.trim_start(),
            None => &self.raw_text,
        }
    }
}

/// The outcome of expanding one subtask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionResult {
    pub ordinal: usize,
    pub result: Result<String, RemoteCallError>,
}

impl ExpansionResult {
    pub fn success(ordinal: usize, text: impl Into<String>) -> Self {
        Self {
            ordinal,
            result: Ok(text.into()),
        }
    }

    pub fn failure(ordinal: usize, error: RemoteCallError) -> Self {
        Self {
            ordinal,
            result: Err(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn text(&self) -> Option<&str> {
        self.result.as_deref().ok()
    }
}
