//! Shared helpers for infra integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::TimeZone;
use chrono_tz::Asia::Tokyo;
use serde_json::{json, Value};
use wiremock::MockServer;
use yotei_core::TimeReference;
use yotei_infra::{HttpClient, OpenAIClient};

pub const COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Friday 2025-01-10 09:30 JST.
pub fn tokyo_reference() -> TimeReference {
    TimeReference::new(Tokyo.with_ymd_and_hms(2025, 1, 10, 9, 30, 0).unwrap())
}

/// Client pointed at the mock server, without transport retries.
pub fn openai_client(server: &MockServer) -> Arc<OpenAIClient> {
    let http = HttpClient::builder()
        .timeout(Duration::from_secs(5))
        .max_attempts(1)
        .build()
        .expect("http client");
    Arc::new(
        OpenAIClient::new("test-api-key", http)
            .with_api_url(format!("{}{}", server.uri(), COMPLETIONS_PATH)),
    )
}

/// Completion whose only choice calls `function` with `arguments`.
pub fn tool_call_reply(function: &str, arguments: &Value) -> Value {
    json!({
        "choices": [{
            "message": {
                "content": null,
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": { "name": function, "arguments": arguments.to_string() }
                }]
            }
        }],
        "usage": { "total_tokens": 120, "prompt_tokens": 100, "completion_tokens": 20 }
    })
}

/// Completion whose only choice is plain assistant text.
pub fn content_reply(content: &str) -> Value {
    json!({
        "choices": [{ "message": { "content": content } }],
        "usage": { "total_tokens": 50, "prompt_tokens": 40, "completion_tokens": 10 }
    })
}
