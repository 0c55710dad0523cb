//! # Yotei Infrastructure
//!
//! Adapters that connect the scheduling core to the outside world.
//!
//! This crate contains:
//! - Retrying HTTP client (`http`)
//! - OpenAI intent model and extraction strategies (`integrations::openai`)
//! - Configuration loading from environment and files (`config`)
//! - Pipeline metrics (`observability`)
//! - Conversions from transport errors into `YoteiError` (`errors`)
//!
//! ## Architecture
//! - Implements the ports defined in `yotei-core`
//! - Never referenced by `yotei-core` itself

pub mod config;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod observability;

pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use integrations::openai::{
    FunctionCallingStrategy, JsonReplyStrategy, OpenAIClient, OpenAIError, OpenAIIntentModel,
};
pub use observability::{PipelineMetrics, PipelineStats};
