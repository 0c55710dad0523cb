//! Intent classification backed by OpenAI structured output

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use yotei_core::{IntentModel, TimeReference};
use yotei_domain::{IntentClassification, Result, TaskType};

use super::client::OpenAIClient;
use super::prompts::{intent_schema, intent_system_prompt, INTENT_SCHEMA_NAME};
use super::types::{ChatCompletionRequest, ChatMessage, IntentReply, OpenAIError, ResponseFormat};

const INTENT_MAX_TOKENS: u32 = 200;
const INTENT_TEMPERATURE: f32 = 0.0;

/// [`IntentModel`] backed by a strict json_schema chat completion.
pub struct OpenAIIntentModel {
    client: Arc<OpenAIClient>,
    model: String,
}

impl OpenAIIntentModel {
    /// Classify with `model`.
    pub fn new(client: Arc<OpenAIClient>, model: impl Into<String>) -> Self {
        Self { client, model: model.into() }
    }
}

#[async_trait]
impl IntentModel for OpenAIIntentModel {
    async fn classify(&self, text: &str, reference: &TimeReference) -> Result<IntentClassification> {
        let payload = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(intent_system_prompt(reference)),
                ChatMessage::user(text),
            ],
            max_tokens: INTENT_MAX_TOKENS,
            temperature: INTENT_TEMPERATURE,
            response_format: Some(ResponseFormat::strict_schema(
                INTENT_SCHEMA_NAME,
                intent_schema(),
            )),
            tools: Vec::new(),
            tool_choice: None,
        };

        let message = self.client.chat(&payload).await?;
        let content = message
            .content
            .ok_or_else(|| OpenAIError::InvalidSchema("classifier reply had no content".into()))?;
        let reply: IntentReply = serde_json::from_str(&content)
            .map_err(|e| OpenAIError::InvalidSchema(format!("classifier reply: {e}")))?;

        let intent = reply.task_type.parse::<TaskType>().map_err(|_| {
            OpenAIError::InvalidSchema(format!("unknown task_type '{}'", reply.task_type))
        })?;
        debug!(%intent, confidence = ?reply.confidence, "intent classified");

        Ok(IntentClassification::new(
            intent,
            reply.confidence.unwrap_or(1.0),
            reply.reason.unwrap_or_default(),
        ))
    }
}
