//! OpenAI Chat Completions wire types
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use yotei_domain::YoteiError;

/// OpenAI API error types
#[derive(Debug, thiserror::Error)]
pub enum OpenAIError {
    /// Connection failure or other transport problem
    #[error("Network error: {0}")]
    Network(String),

    /// OpenAI API returned an error response
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Rate limit exceeded
    #[error("Rate limit exceeded (retry after {0}s)")]
    RateLimit(u64),

    /// Invalid or revoked API key
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Reply does not have the shape we asked for
    #[error("Invalid response schema: {0}")]
    InvalidSchema(String),

    #[error("Request timeout after {0:?}")]
    Timeout(Duration),
}

impl From<OpenAIError> for YoteiError {
    fn from(value: OpenAIError) -> Self {
        match value {
            OpenAIError::Network(msg) => YoteiError::Network(msg),
            OpenAIError::RateLimit(secs) => {
                YoteiError::Network(format!("OpenAI rate limit exceeded (retry after {secs}s)"))
            }
            OpenAIError::Authentication(msg) => YoteiError::Auth(msg),
            OpenAIError::Timeout(after) => {
                YoteiError::Timeout(format!("OpenAI request exceeded {after:?}"))
            }
            other @ (OpenAIError::Api { .. } | OpenAIError::InvalidSchema(_)) => {
                YoteiError::Llm(other.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_schema: Option<JsonSchema>,
}

impl ResponseFormat {
    pub fn strict_schema(name: &str, schema: Value) -> Self {
        Self {
            format_type: "json_schema".to_string(),
            json_schema: Some(JsonSchema { name: name.to_string(), schema, strict: Some(true) }),
        }
    }
}

/// JSON schema wrapper used by OpenAI when `response_format = "json_schema"`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct JsonSchema {
    pub name: String,
    pub schema: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
}

/// A callable function offered to the model.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct Tool {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub function: FunctionDefinition,
}

impl Tool {
    pub fn function(name: &str, description: &str, parameters: Value) -> Self {
        Self {
            tool_type: "function".to_string(),
            function: FunctionDefinition {
                name: name.to_string(),
                description: description.to_string(),
                parameters,
                strict: true,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
    pub strict: bool,
}

/// Forces the model to call one named function.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ToolChoice {
    #[serde(rename = "type")]
    pub choice_type: String,
    pub function: ToolChoiceFunction,
}

impl ToolChoice {
    pub fn function(name: &str) -> Self {
        Self {
            choice_type: "function".to_string(),
            function: ToolChoiceFunction { name: name.to_string() },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ToolChoiceFunction {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: AssistantMessage,
}

/// Assistant turn: free text, tool calls, or both.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct AssistantMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
}

impl AssistantMessage {
    /// Arguments of the first call to `name`.
    pub fn function_arguments(&self, name: &str) -> Option<&str> {
        self.tool_calls
            .iter()
            .find(|call| call.function.name == name)
            .map(|call| call.function.arguments.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ToolCall {
    pub function: FunctionCall,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FunctionCall {
    pub name: String,
    /// JSON document encoded as a string.
    pub arguments: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct Usage {
    pub total_tokens: u32,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// Classifier reply body.
#[derive(Debug, Deserialize)]
pub(crate) struct IntentReply {
    pub task_type: String,
    #[serde(default)]
    pub confidence: Option<f32>,
    #[serde(default)]
    pub reason: Option<String>,
}
