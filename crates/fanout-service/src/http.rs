use std::time::Duration;

use async_trait::async_trait;
use fanout_core::{ChatMessage, RemoteCallError};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::CompletionClient;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Async client for an OpenAI-compatible `/chat/completions` endpoint.
///
/// Cloning is cheap and clones share one connection pool.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    base_url: String,
    client: Client,
    api_key: Option<String>,
}

impl OpenAiClient {
    pub fn new(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            client: Client::new(),
            api_key: None,
        }
    }

    pub fn with_api_key(base_url: &str, key: String) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            client: Client::new(),
            api_key: Some(key),
        }
    }

    /// Replace the connection pool with one that applies a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, RemoteCallError> {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteCallError::Transport(format!("build client: {e}")))?;
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn with_auth(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    /// Check that the service is reachable and accepts our credentials.
    pub async fn health_check(&self) -> Result<(), RemoteCallError> {
        let builder = self.client.get(format!("{}/models", self.base_url));
        let resp = self
            .with_auth(builder)
            .send()
            .await
            .map_err(|e| RemoteCallError::Transport(format!("connection failed: {e}")))?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(parse_error(resp).await)
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        model: &str,
    ) -> Result<String, RemoteCallError> {
        let builder = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&ChatRequest { model, messages });
        let resp = self
            .with_auth(builder)
            .send()
            .await
            .map_err(|e| RemoteCallError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(parse_error(resp).await);
        }

        let body: ChatResponse = resp
            .json()
            .await
            .map_err(|e| RemoteCallError::Malformed(format!("json decode: {e}")))?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| RemoteCallError::Malformed("response has no message content".into()))?;

        debug!(model, chars = content.len(), "completion received");
        Ok(content)
    }
}

async fn parse_error(resp: reqwest::Response) -> RemoteCallError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    // OpenAI wraps errors as {"error": {"message": ...}}; some proxies use a bare string.
    let msg = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| {
            v["error"]["message"]
                .as_str()
                .or_else(|| v["error"].as_str())
                .map(String::from)
        })
        .unwrap_or(body);

    RemoteCallError::Status {
        status: status.as_u16(),
        body: msg,
    }
}
