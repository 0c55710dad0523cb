//! Port interfaces for intent classification

use async_trait::async_trait;
use yotei_domain::{IntentClassification, Result};

use crate::time_reference::TimeReference;

/// Model that labels a message as `availability_check`, `add_event` or
/// `unknown`.
#[async_trait]
pub trait IntentModel: Send + Sync {
    /// Classify one message against the request's time reference.
    async fn classify(&self, text: &str, reference: &TimeReference) -> Result<IntentClassification>;
}
