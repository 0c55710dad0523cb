//! Structured extractor - tries each strategy in order until one succeeds

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use yotei_domain::{ExtractionResult, Result, StrategyKind, TaskType, YoteiError};

use super::ports::{ExtractionRequest, ExtractionStrategy};
use super::validation::validate_extraction;
use crate::observer::PipelineObserver;
use crate::time_reference::TimeReference;
use crate::utils::patterns::normalize;

/// A validated extraction and the strategy that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted {
    /// Validated result.
    pub result: ExtractionResult,
    /// Strategy that produced it.
    pub strategy: StrategyKind,
}

/// Ordered list of strategies behind one deadline per call.
pub struct StructuredExtractor {
    strategies: Vec<Arc<dyn ExtractionStrategy>>,
    timeout: Duration,
}

impl StructuredExtractor {
    /// Strategies are tried in order, each bounded by `timeout`.
    pub fn new(strategies: Vec<Arc<dyn ExtractionStrategy>>, timeout: Duration) -> Self {
        Self { strategies, timeout }
    }

    /// Primary strategy first, then the fallback.
    pub fn with_fallback(
        primary: Arc<dyn ExtractionStrategy>,
        fallback: Arc<dyn ExtractionStrategy>,
        timeout: Duration,
    ) -> Self {
        Self::new(vec![primary, fallback], timeout)
    }

    /// Run strategies until one yields a reply.
    ///
    /// # Errors
    /// Returns the last strategy's error when every strategy failed, or
    /// `YoteiError::Internal` when no strategy is configured.
    pub async fn extract(
        &self,
        text: &str,
        intent: TaskType,
        reference: &TimeReference,
        observer: &dyn PipelineObserver,
    ) -> Result<Extracted> {
        let request = ExtractionRequest { text, intent, reference };
        let normalized = normalize(text);
        let mut last_error =
            YoteiError::Internal("no extraction strategy configured".to_string());

        for strategy in &self.strategies {
            let kind = strategy.kind();
            let outcome = tokio::time::timeout(self.timeout, strategy.extract(&request))
                .await
                .unwrap_or_else(|_| {
                    Err(YoteiError::Timeout(format!(
                        "{kind} extraction exceeded {}s",
                        self.timeout.as_secs_f32()
                    )))
                });

            match outcome {
                Ok(raw) => {
                    if let Some(model_task) = raw.task_type.as_deref() {
                        if model_task != intent.as_str() {
                            debug!(model_task, intent = %intent, "model task_type overridden by classifier");
                        }
                    }
                    let validated =
                        validate_extraction(raw, &normalized, intent, reference.today());
                    for reason in &validated.dropped {
                        observer.on_slot_dropped(reason);
                    }
                    observer.on_extracted(kind, validated.result.slots.len(), validated.dropped.len());
                    return Ok(Extracted { result: validated.result, strategy: kind });
                }
                Err(error) => {
                    observer.on_strategy_failed(kind, &error);
                    last_error = error;
                }
            }
        }

        Err(last_error)
    }
}
