//! Extraction strategies backed by OpenAI
//!
//! - [`FunctionCallingStrategy`]: forces a strict function call (primary)
//! - [`JsonReplyStrategy`]: asks for a bare JSON object and digs it out of
//!   whatever the model wrote (fallback)

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};
use yotei_core::{ExtractionRequest, ExtractionStrategy};
use yotei_domain::{RawExtraction, Result, StrategyKind};

use super::client::OpenAIClient;
use super::prompts::{extraction_parameters, extraction_system_prompt, EXTRACTION_FUNCTION};
use super::types::{ChatCompletionRequest, ChatMessage, OpenAIError, Tool, ToolChoice};

const EXTRACTION_MAX_TOKENS: u32 = 2_000;
const EXTRACTION_TEMPERATURE: f32 = 0.1;

/// Primary extraction: one forced `extract_schedule` function call.
pub struct FunctionCallingStrategy {
    client: Arc<OpenAIClient>,
    model: String,
}

impl FunctionCallingStrategy {
    /// Extract with `model`.
    pub fn new(client: Arc<OpenAIClient>, model: impl Into<String>) -> Self {
        Self { client, model: model.into() }
    }
}

#[async_trait]
impl ExtractionStrategy for FunctionCallingStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Primary
    }

    async fn extract(&self, request: &ExtractionRequest<'_>) -> Result<RawExtraction> {
        let payload = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(extraction_system_prompt(
                    request.reference,
                    request.intent,
                    false,
                )),
                ChatMessage::user(request.text),
            ],
            max_tokens: EXTRACTION_MAX_TOKENS,
            temperature: EXTRACTION_TEMPERATURE,
            response_format: None,
            tools: vec![Tool::function(
                EXTRACTION_FUNCTION,
                "メッセージから日時・タイトル・場所を抽出する",
                extraction_parameters(),
            )],
            tool_choice: Some(ToolChoice::function(EXTRACTION_FUNCTION)),
        };

        let message = self.client.chat(&payload).await?;
        let arguments = message.function_arguments(EXTRACTION_FUNCTION).ok_or_else(|| {
            OpenAIError::InvalidSchema(format!("model did not call {EXTRACTION_FUNCTION}"))
        })?;

        let raw: RawExtraction = serde_json::from_str(arguments).map_err(|e| {
            OpenAIError::InvalidSchema(format!("function arguments are not valid: {e}"))
        })?;
        debug!(model = %self.model, candidates = raw.dates.len(), "function call parsed");
        Ok(raw)
    }
}

/// Fallback extraction: free-form reply, first `{` to last `}` parsed as JSON.
pub struct JsonReplyStrategy {
    client: Arc<OpenAIClient>,
    model: String,
}

impl JsonReplyStrategy {
    /// Extract with `model`.
    pub fn new(client: Arc<OpenAIClient>, model: impl Into<String>) -> Self {
        Self { client, model: model.into() }
    }
}

#[async_trait]
impl ExtractionStrategy for JsonReplyStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Fallback
    }

    async fn extract(&self, request: &ExtractionRequest<'_>) -> Result<RawExtraction> {
        let payload = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(extraction_system_prompt(
                    request.reference,
                    request.intent,
                    true,
                )),
                ChatMessage::user(request.text),
            ],
            max_tokens: EXTRACTION_MAX_TOKENS,
            temperature: EXTRACTION_TEMPERATURE,
            response_format: None,
            tools: Vec::new(),
            tool_choice: None,
        };

        let message = self.client.chat(&payload).await?;
        let content = message.content.unwrap_or_default();
        let object = json_object_span(&content)
            .ok_or_else(|| OpenAIError::InvalidSchema("reply contained no JSON object".into()))?;

        serde_json::from_str(object).map_err(|e| {
            warn!(model = %self.model, error = %e, "fallback reply is not valid JSON");
            OpenAIError::InvalidSchema(format!("reply JSON is not valid: {e}")).into()
        })
    }
}

/// Outermost `{ ... }` span: first opening brace to last closing brace.
fn json_object_span(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    (end > start).then(|| &content[start..=end])
}
