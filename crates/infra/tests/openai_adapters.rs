//! OpenAI adapters against a mock chat-completions endpoint

mod support;

use serde_json::json;
use support::{content_reply, openai_client, tokyo_reference, tool_call_reply, COMPLETIONS_PATH};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use yotei_core::{ExtractionRequest, ExtractionStrategy, IntentModel};
use yotei_domain::{StrategyKind, TaskType, YoteiError};
use yotei_infra::{FunctionCallingStrategy, JsonReplyStrategy, OpenAIIntentModel};

#[tokio::test]
async fn function_calling_strategy_parses_tool_arguments() {
    let server = MockServer::start().await;
    let arguments = json!({
        "task_type": "add_event",
        "dates": [{
            "date": "2025-01-14", "time": "14:00", "end_time": null, "end_date": null,
            "title": "打ち合わせ", "description": null
        }],
        "location": null,
        "counterpart_location": null,
        "meeting_duration_hours": 1.5
    });
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .and(header("Authorization", "Bearer test-api-key"))
        .and(body_partial_json(json!({
            "model": "gpt-4o",
            "tool_choice": { "type": "function", "function": { "name": "extract_schedule" } }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(tool_call_reply("extract_schedule", &arguments)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let strategy = FunctionCallingStrategy::new(openai_client(&server), "gpt-4o");
    let reference = tokyo_reference();
    let request = ExtractionRequest {
        text: "来週火曜日の14時から打ち合わせ",
        intent: TaskType::AddEvent,
        reference: &reference,
    };

    let raw = strategy.extract(&request).await.expect("extraction");

    assert_eq!(strategy.kind(), StrategyKind::Primary);
    assert_eq!(raw.task_type.as_deref(), Some("add_event"));
    assert_eq!(raw.dates.len(), 1);
    assert_eq!(raw.dates[0].time.as_deref(), Some("14:00"));
    assert_eq!(raw.dates[0].end_time, None);
    assert_eq!(raw.meeting_duration_hours, Some(1.5));
}

#[tokio::test]
async fn function_calling_strategy_fails_without_a_tool_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(content_reply("すみません")))
        .mount(&server)
        .await;

    let strategy = FunctionCallingStrategy::new(openai_client(&server), "gpt-4o");
    let reference = tokyo_reference();
    let request = ExtractionRequest {
        text: "明日空いてる？",
        intent: TaskType::AvailabilityCheck,
        reference: &reference,
    };

    assert!(matches!(strategy.extract(&request).await, Err(YoteiError::Llm(_))));
}

#[tokio::test]
async fn json_reply_strategy_digs_the_object_out_of_prose() {
    let server = MockServer::start().await;
    let reply = "抽出結果です。\n```json\n{\"task_type\": \"availability_check\", \
                 \"dates\": [{\"date\": \"2025-01-11\", \"time\": \"10:00\", \"end_time\": \"12:00\"}]}\n```";
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "model": "gpt-4o-mini" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(content_reply(reply)))
        .expect(1)
        .mount(&server)
        .await;

    let strategy = JsonReplyStrategy::new(openai_client(&server), "gpt-4o-mini");
    let reference = tokyo_reference();
    let request = ExtractionRequest {
        text: "明日10時から12時は空いてる？",
        intent: TaskType::AvailabilityCheck,
        reference: &reference,
    };

    let raw = strategy.extract(&request).await.expect("extraction");

    assert_eq!(strategy.kind(), StrategyKind::Fallback);
    assert_eq!(raw.dates[0].date.as_deref(), Some("2025-01-11"));
    assert_eq!(raw.dates[0].end_time.as_deref(), Some("12:00"));
}

#[tokio::test]
async fn json_reply_strategy_rejects_malformed_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(content_reply("{\"dates\": [ oops }")),
        )
        .mount(&server)
        .await;

    let strategy = JsonReplyStrategy::new(openai_client(&server), "gpt-4o-mini");
    let reference = tokyo_reference();
    let request = ExtractionRequest {
        text: "明日",
        intent: TaskType::Unknown,
        reference: &reference,
    };

    assert!(matches!(strategy.extract(&request).await, Err(YoteiError::Llm(_))));
}

#[tokio::test]
async fn intent_model_reads_structured_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "response_format": { "type": "json_schema", "json_schema": { "strict": true } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(content_reply(
            r#"{"task_type": "add_event", "confidence": 0.92, "reason": "予定内容がある"}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let model = OpenAIIntentModel::new(openai_client(&server), "gpt-4o-mini");

    let classification =
        model.classify("明日の午前9時から会議を追加して", &tokyo_reference()).await.unwrap();

    assert_eq!(classification.intent, TaskType::AddEvent);
    assert!((classification.confidence - 0.92).abs() < 1e-6);
    assert_eq!(classification.reason, "予定内容がある");
}

#[tokio::test]
async fn intent_model_rejects_unknown_labels() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(content_reply(
            r#"{"task_type": "delete_event", "confidence": 0.9, "reason": "x"}"#,
        )))
        .mount(&server)
        .await;

    let model = OpenAIIntentModel::new(openai_client(&server), "gpt-4o-mini");

    let result = model.classify("明日の予定を消して", &tokyo_reference()).await;
    assert!(matches!(result, Err(YoteiError::Llm(msg)) if msg.contains("delete_event")));
}

#[tokio::test]
async fn invalid_api_key_surfaces_as_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Incorrect API key provided"))
        .mount(&server)
        .await;

    let model = OpenAIIntentModel::new(openai_client(&server), "gpt-4o-mini");

    let result = model.classify("明日空いてる？", &tokyo_reference()).await;
    assert!(matches!(result, Err(YoteiError::Auth(_))));
}
