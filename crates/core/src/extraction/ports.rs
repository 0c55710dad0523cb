//! Port interfaces for structured extraction

use async_trait::async_trait;
use yotei_domain::{RawExtraction, Result, StrategyKind, TaskType};

use crate::time_reference::TimeReference;

/// Everything a strategy needs to build its prompt.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionRequest<'a> {
    /// Raw user message.
    pub text: &'a str,
    /// Intent from the classifier.
    pub intent: TaskType,
    /// "Now" for this request.
    pub reference: &'a TimeReference,
}

/// One way of asking a model for the extraction schema.
///
/// A strategy fails when the model's reply cannot be turned into a
/// [`RawExtraction`] (no tool call, unparseable JSON, transport errors).
#[async_trait]
pub trait ExtractionStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    async fn extract(&self, request: &ExtractionRequest<'_>) -> Result<RawExtraction>;
}
