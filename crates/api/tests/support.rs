//! Shared helpers for AppContext integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};
use yotei_core::FixedClock;
use yotei_domain::{LlmConfig, PipelineConfig, TravelConfig, YoteiConfig};
use yotei_lib::AppContext;

pub const CLASSIFIER_MODEL: &str = "test-classifier";
pub const PRIMARY_MODEL: &str = "test-primary";
pub const FALLBACK_MODEL: &str = "test-fallback";

pub fn test_config(server: &MockServer) -> YoteiConfig {
    YoteiConfig {
        llm: LlmConfig {
            api_key: "test-api-key".into(),
            api_url: format!("{}/v1/chat/completions", server.uri()),
            primary_model: PRIMARY_MODEL.into(),
            fallback_model: FALLBACK_MODEL.into(),
            classifier_model: CLASSIFIER_MODEL.into(),
            request_timeout_secs: 5,
            max_attempts: 1,
        },
        pipeline: PipelineConfig { timezone: "Asia/Tokyo".into(), call_timeout_secs: 5 },
        travel: TravelConfig::default(),
    }
}

/// Context whose clock reads Wednesday 2025-01-08 10:00 JST.
pub fn test_context(server: &MockServer) -> AppContext {
    let now = Utc.with_ymd_and_hms(2025, 1, 8, 1, 0, 0).unwrap();
    AppContext::new_with_clock(test_config(server), Arc::new(FixedClock(now)))
        .expect("context should build")
}

fn for_model(model: &str) -> wiremock::MockBuilder {
    Mock::given(method("POST")).and(body_partial_json(json!({ "model": model })))
}

pub async fn mock_intent(server: &MockServer, task_type: &str) {
    let content = json!({ "task_type": task_type, "confidence": 0.9, "reason": "test" }).to_string();
    for_model(CLASSIFIER_MODEL)
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": content } }]
        })))
        .mount(server)
        .await;
}

pub async fn mock_primary(server: &MockServer, arguments: Value) {
    for_model(PRIMARY_MODEL)
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": { "name": "extract_schedule", "arguments": arguments.to_string() }
                    }]
                }
            }]
        })))
        .mount(server)
        .await;
}

pub async fn mock_fallback(server: &MockServer, reply: &str) {
    for_model(FALLBACK_MODEL)
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": reply } }]
        })))
        .mount(server)
        .await;
}

pub async fn mock_failure(server: &MockServer, model: &str, status: u16) {
    for_model(model).respond_with(ResponseTemplate::new(status)).mount(server).await;
}
