//! Preflight and a full batch over HTTP against an in-process fake service.

use std::sync::Arc;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Parser;
use fanout_core::Strategy;
use fanout_runner::config::RunnerConfig;
use fanout_runner::orchestrator::Orchestrator;
use fanout_runner::{preflight, report};
use fanout_service::{OpenAiClient, TiktokenCounter};
use serde_json::{json, Value};
use tokio::net::TcpListener;

async fn chat(Json(req): Json<Value>) -> Json<Value> {
    let prompt = req["messages"][0]["content"].as_str().unwrap_or("");
    let content = if prompt.contains("only giving the skeleton") {
        "1. Readability\n2. Testing\n3. Simplicity".to_string()
    } else if let Some(idx) = prompt.find("writing of point ") {
        let rest = &prompt[idx + "writing of point ".len()..];
        let point = rest.split(". Expand").next().unwrap_or(rest);
        format!("Expanded {point}")
    } else {
        "A single long answer about software engineering.".to_string()
    };
    Json(json!({"choices": [{"message": {"role": "assistant", "content": content}}]}))
}

async fn models(headers: HeaderMap) -> StatusCode {
    match headers.get("authorization") {
        Some(v) if v == "Bearer sk-good" => StatusCode::OK,
        _ => StatusCode::UNAUTHORIZED,
    }
}

async fn spawn_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new()
        .route("/v1/chat/completions", post(chat))
        .route("/v1/models", get(models));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/v1")
}

fn config(base_url: &str, key: &str, extra: &[&str]) -> RunnerConfig {
    let mut argv = vec!["fanout", "--base-url", base_url, "--api-key", key];
    argv.extend_from_slice(extra);
    RunnerConfig::parse_from(argv)
}

fn client_for(config: &RunnerConfig) -> OpenAiClient {
    OpenAiClient::with_api_key(&config.base_url, config.api_key.clone().unwrap())
}

#[tokio::test]
async fn preflight_accepts_valid_key() {
    let base = spawn_server().await;
    let config = config(&base, "sk-good", &[]);
    preflight::run_all(&config, &client_for(&config)).await.unwrap();
}

#[tokio::test]
async fn preflight_rejects_bad_key() {
    let base = spawn_server().await;
    let config = config(&base, "sk-bad", &[]);
    let err = preflight::run_all(&config, &client_for(&config))
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("401"));
}

#[tokio::test]
async fn preflight_skip_health_check() {
    let config = config("http://127.0.0.1:1/v1", "sk-any", &["--skip-health-check"]);
    preflight::run_all(&config, &client_for(&config)).await.unwrap();
}

#[tokio::test]
async fn full_batch_over_http() {
    let base = spawn_server().await;
    let config = config(&base, "sk-good", &["--iterations", "2"]);
    let client = client_for(&config);
    preflight::run_all(&config, &client).await.unwrap();

    let orch = Orchestrator::new(
        Arc::new(client),
        Arc::new(TiktokenCounter::new()),
        config.run_options(),
    );
    let batch = orch
        .run_batch(&config.prompt, &config.model, config.iterations)
        .await;

    assert_eq!(batch.len(), 4);
    let parallel: Vec<_> = batch.by_strategy(Strategy::Parallel).collect();
    assert_eq!(parallel.len(), 2);
    assert_eq!(
        parallel[0].response_text,
        "Expanded 1. Readability\nExpanded 2. Testing\nExpanded 3. Simplicity"
    );
    assert!(batch.iter().all(|o| o.tokens_per_second() > 0.0));

    let summaries = report::summarize(&batch);
    assert_eq!(summaries.len(), 2);
    assert!(summaries.iter().all(|s| s.count == 2));

    let json = serde_json::to_value(&batch).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 4);
    assert_eq!(json[0]["strategy"], "parallel");
}
