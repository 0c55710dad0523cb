/// OpenAI adapters for the scheduling pipeline
///
/// - **Client**: [`OpenAIClient`], one chat-completions endpoint behind the
///   retrying [`crate::http::HttpClient`]
/// - **Strategies**: [`FunctionCallingStrategy`] (primary, strict function
///   call) and [`JsonReplyStrategy`] (fallback, free-form JSON reply)
/// - **Intent**: [`OpenAIIntentModel`], strict JSON schema classification
///
/// # Usage
///
/// ```no_run
/// use std::sync::Arc;
///
/// use yotei_domain::LlmConfig;
/// use yotei_infra::integrations::openai::{FunctionCallingStrategy, OpenAIClient};
/// # fn example() -> Result<(), yotei_domain::YoteiError> {
/// let config = LlmConfig { api_key: "sk-...".into(), ..LlmConfig::default() };
/// let client = Arc::new(OpenAIClient::from_config(&config)?);
/// let primary = FunctionCallingStrategy::new(client, config.primary_model.clone());
/// # let _ = primary;
/// # Ok(())
/// # }
/// ```
///
/// # Error Handling
///
/// Adapter failures are [`OpenAIError`]s and convert into
/// [`yotei_domain::YoteiError`]; the pipeline treats every one of them as a
/// strategy failure.
pub mod client;
pub mod intent;
pub(crate) mod prompts;
pub mod strategies;
pub mod types;

pub use client::OpenAIClient;
pub use intent::OpenAIIntentModel;
pub use strategies::{FunctionCallingStrategy, JsonReplyStrategy};
pub use types::OpenAIError;
