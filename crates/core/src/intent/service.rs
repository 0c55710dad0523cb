//! Intent classifier - never fails, degrades to `availability_check`

use std::sync::Arc;
use std::time::Duration;

use yotei_domain::{IntentClassification, YoteiError};

use super::ports::IntentModel;
use crate::time_reference::TimeReference;

/// Classification plus the error that forced a fallback, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct IntentOutcome {
    /// Intent to use downstream.
    pub classification: IntentClassification,
    /// Set when the model failed and the default was used.
    pub fallback_cause: Option<YoteiError>,
}

impl IntentOutcome {
    /// True when the default intent was substituted.
    pub fn is_fallback(&self) -> bool {
        self.fallback_cause.is_some()
    }
}

/// Wraps an [`IntentModel`] with a deadline and the fallback rule.
pub struct IntentClassifier {
    model: Arc<dyn IntentModel>,
    timeout: Duration,
}

impl IntentClassifier {
    /// Classifier bounded by `timeout` per call.
    pub fn new(model: Arc<dyn IntentModel>, timeout: Duration) -> Self {
        Self { model, timeout }
    }

    /// Classify `text`. Model errors and timeouts yield
    /// [`IntentClassification::fallback`].
    pub async fn classify(&self, text: &str, reference: &TimeReference) -> IntentOutcome {
        let result = tokio::time::timeout(self.timeout, self.model.classify(text, reference))
            .await
            .unwrap_or_else(|_| {
                Err(YoteiError::Timeout(format!(
                    "intent classification exceeded {}s",
                    self.timeout.as_secs_f32()
                )))
            });

        match result {
            Ok(classification) => IntentOutcome { classification, fallback_cause: None },
            Err(error) => IntentOutcome {
                classification: IntentClassification::fallback(),
                fallback_cause: Some(error),
            },
        }
    }
}
