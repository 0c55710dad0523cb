//! OpenAI Chat Completions client
use std::time::Duration;

use reqwest::Method;
use tracing::debug;
use yotei_domain::constants::DEFAULT_OPENAI_API_URL;
use yotei_domain::{LlmConfig, YoteiError};

use super::types::{AssistantMessage, ChatCompletionRequest, ChatCompletionResponse, OpenAIError};
use crate::http::{retry_after, HttpClient};

/// Thin wrapper over one chat-completions endpoint.
///
/// Model choice belongs to the callers (strategies and the intent model), so a
/// single client is shared between them.
pub struct OpenAIClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    timeout: Duration,
}

impl OpenAIClient {
    /// Client for the public endpoint with the default timeout.
    pub fn new(api_key: impl Into<String>, http_client: HttpClient) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            api_url: DEFAULT_OPENAI_API_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Client with its own HTTP transport configured from `config`.
    ///
    /// # Errors
    /// Returns `YoteiError` if the HTTP client cannot be built.
    pub fn from_config(config: &LlmConfig) -> Result<Self, YoteiError> {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        let http_client =
            HttpClient::builder().timeout(timeout).max_attempts(config.max_attempts).build()?;

        Ok(Self::new(config.api_key.clone(), http_client)
            .with_api_url(config.api_url.clone())
            .with_timeout(timeout))
    }

    /// Point at another chat completions URL (proxies, tests).
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Only used to label timeout errors; the transport owns the deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send one request and return the first assistant message.
    pub(crate) async fn chat(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<AssistantMessage, OpenAIError> {
        let builder = self
            .http_client
            .request(Method::POST, &self.api_url)
            .bearer_auth(&self.api_key)
            .json(request);

        let response = self.http_client.send(builder).await.map_err(|err| match err {
            YoteiError::Timeout(_) => OpenAIError::Timeout(self.timeout),
            YoteiError::Auth(msg) => OpenAIError::Authentication(msg),
            other => OpenAIError::Network(other.to_string()),
        })?;

        let status = response.status();
        debug!(status = status.as_u16(), model = %request.model, "received OpenAI response");

        if !status.is_success() {
            return Err(Self::error_for_status(status.as_u16(), response).await);
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| OpenAIError::InvalidSchema(format!("failed to parse response: {e}")))?;

        if let Some(usage) = body.usage {
            debug!(
                model = %request.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "OpenAI token usage"
            );
        }

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| OpenAIError::InvalidSchema("response contained no choices".into()))
    }

    async fn error_for_status(status: u16, response: reqwest::Response) -> OpenAIError {
        let retry_after_secs = retry_after(response.headers()).map(|delay| delay.as_secs());
        let message = response.text().await.unwrap_or_else(|_| "unknown error".to_string());

        match status {
            401 | 403 => OpenAIError::Authentication(format!("invalid API key ({status})")),
            429 => OpenAIError::RateLimit(retry_after_secs.unwrap_or(60)),
            _ => OpenAIError::Api { status, message },
        }
    }
}
