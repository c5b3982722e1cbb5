use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use fanout_core::{ChatMessage, RemoteCallError};

use crate::CompletionClient;

/// A call observed by `MockClient`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone)]
struct Rule {
    needle: String,
    reply: Result<String, RemoteCallError>,
    delay: Duration,
}

/// Scripted `CompletionClient` for tests.
///
/// Each call is matched against the rules in insertion order; the first rule
/// whose needle occurs in the last message's content decides the reply. Calls
/// that match nothing get the fallback, or a `Malformed` error if none is set.
#[derive(Debug, Default)]
pub struct MockClient {
    rules: Vec<Rule>,
    fallback: Option<String>,
    calls: Mutex<Vec<RecordedCall>>,
    completed: Mutex<Vec<String>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with `text` to prompts containing `needle`.
    pub fn respond(self, needle: &str, text: &str) -> Self {
        self.rule(needle, Ok(text.to_string()), Duration::ZERO)
    }

    /// Reply with `text` after sleeping for `delay`.
    pub fn respond_after(self, needle: &str, text: &str, delay: Duration) -> Self {
        self.rule(needle, Ok(text.to_string()), delay)
    }

    /// Fail prompts containing `needle` with `error`.
    pub fn fail_on(self, needle: &str, error: RemoteCallError) -> Self {
        self.rule(needle, Err(error), Duration::ZERO)
    }

    /// Fail with `error` after sleeping for `delay`.
    pub fn fail_after(self, needle: &str, error: RemoteCallError, delay: Duration) -> Self {
        self.rule(needle, Err(error), delay)
    }

    /// Reply with `text` to anything no rule matched.
    pub fn otherwise(mut self, text: &str) -> Self {
        self.fallback = Some(text.to_string());
        self
    }

    fn rule(
        mut self,
        needle: &str,
        reply: Result<String, RemoteCallError>,
        delay: Duration,
    ) -> Self {
        self.rules.push(Rule {
            needle: needle.to_string(),
            reply,
            delay,
        });
        self
    }

    /// Every call received so far, in arrival order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Needles of matched rules in the order their replies were delivered.
    /// Fallback replies are recorded as `"*"`.
    pub fn completion_order(&self) -> Vec<String> {
        self.completed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl CompletionClient for MockClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        model: &str,
    ) -> Result<String, RemoteCallError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(RecordedCall {
                model: model.to_string(),
                messages: messages.to_vec(),
            });

        let content = messages.last().map(|m| m.content.as_str()).unwrap_or("");
        let rule = self
            .rules
            .iter()
            .find(|r| content.contains(&r.needle))
            .cloned();

        let (key, reply) = match rule {
            Some(rule) => {
                if !rule.delay.is_zero() {
                    tokio::time::sleep(rule.delay).await;
                }
                (rule.needle, rule.reply)
            }
            None => match &self.fallback {
                Some(text) => ("*".to_string(), Ok(text.clone())),
                None => (
                    "*".to_string(),
                    Err(RemoteCallError::Malformed("no scripted reply".into())),
                ),
            },
        };

        self.completed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(key);
        reply
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_matching_rule_wins() {
        let mock = MockClient::new()
            .respond("alpha", "first")
            .respond("alp", "second");
        let reply = mock.complete(&[ChatMessage::user("alpha")], "m").await.unwrap();
        assert_eq!(reply, "first");
    }

    #[tokio::test]
    async fn unmatched_without_fallback_errors() {
        let mock = MockClient::new().respond("alpha", "a");
        let err = mock.complete(&[ChatMessage::user("beta")], "m").await.unwrap_err();
        assert!(matches!(err, RemoteCallError::Malformed(_)));
    }

    #[tokio::test]
    async fn records_calls_and_fallback() {
        let mock = MockClient::new().otherwise("fallback");
        let reply = mock.complete(&[ChatMessage::user("x")], "gpt").await.unwrap();
        assert_eq!(reply, "fallback");
        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].model, "gpt");
        assert_eq!(calls[0].messages, vec![ChatMessage::user("x")]);
        assert_eq!(mock.completion_order(), vec!["*".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn delays_reorder_completions() {
        let mock = MockClient::new()
            .respond_after("slow", "s", Duration::from_millis(50))
            .respond_after("fast", "f", Duration::from_millis(10));
        let slow_msgs = [ChatMessage::user("slow")];
        let fast_msgs = [ChatMessage::user("fast")];
        let (s, f) = tokio::join!(
            mock.complete(&slow_msgs, "m"),
            mock.complete(&fast_msgs, "m"),
        );
        assert_eq!(s.unwrap(), "s");
        assert_eq!(f.unwrap(), "f");
        assert_eq!(mock.completion_order(), vec!["fast", "slow"]);
    }
}
