//! Configuration structures
//!
//! Plain data only; loading lives in `yotei-infra::config`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CLASSIFIER_MODEL, DEFAULT_FALLBACK_MODEL, DEFAULT_LLM_TIMEOUT_SECS,
    DEFAULT_OPENAI_API_URL, DEFAULT_PRIMARY_MODEL, DEFAULT_TIMEZONE, DEFAULT_TRAVEL_BUFFER_MINUTES,
};
use crate::{Result, YoteiError};

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct YoteiConfig {
    /// Model endpoints and credentials.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Timezone and per-call deadlines.
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Travel buffer policy.
    #[serde(default)]
    pub travel: TravelConfig,
}

impl YoteiConfig {
    /// Reject configurations the pipeline cannot run with.
    ///
    /// # Errors
    /// Returns `YoteiError::Config` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.llm.api_key.trim().is_empty() {
            return Err(YoteiError::Config("llm.api_key must not be empty".into()));
        }
        if self.llm.request_timeout_secs == 0 {
            return Err(YoteiError::Config("llm.request_timeout_secs must be positive".into()));
        }
        if self.pipeline.call_timeout_secs == 0 {
            return Err(YoteiError::Config("pipeline.call_timeout_secs must be positive".into()));
        }
        if self.pipeline.timezone.trim().is_empty() {
            return Err(YoteiError::Config("pipeline.timezone must not be empty".into()));
        }
        Ok(())
    }
}

/// Language model access
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LlmConfig {
    /// Bearer token for the chat completions endpoint.
    pub api_key: String,
    /// Full chat completions URL.
    pub api_url: String,
    /// Strict function-calling extraction.
    pub primary_model: String,
    /// Cheaper free-form JSON extraction.
    pub fallback_model: String,
    /// Intent classification.
    pub classifier_model: String,
    /// Per-HTTP-request timeout.
    pub request_timeout_secs: u64,
    /// Transport attempts per call (1 = no retry).
    pub max_attempts: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: DEFAULT_OPENAI_API_URL.to_string(),
            primary_model: DEFAULT_PRIMARY_MODEL.to_string(),
            fallback_model: DEFAULT_FALLBACK_MODEL.to_string(),
            classifier_model: DEFAULT_CLASSIFIER_MODEL.to_string(),
            request_timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
            max_attempts: 1,
        }
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("api_url", &self.api_url)
            .field("primary_model", &self.primary_model)
            .field("fallback_model", &self.fallback_model)
            .field("classifier_model", &self.classifier_model)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

/// Pipeline behaviour
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PipelineConfig {
    /// IANA name, e.g. `Asia/Tokyo`.
    pub timezone: String,
    /// Upper bound for each awaited model call.
    pub call_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            call_timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
        }
    }
}

/// Travel buffer insertion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TravelConfig {
    /// Insert buffers at all.
    pub enabled: bool,
    /// Buffer length when no estimate applies.
    pub default_buffer_minutes: u32,
    /// Size buffers from the city-pair table when both locations are known.
    pub use_estimates: bool,
}

impl Default for TravelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_buffer_minutes: DEFAULT_TRAVEL_BUFFER_MINUTES,
            use_estimates: true,
        }
    }
}
