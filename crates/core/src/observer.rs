//! Observability port for the scheduling pipeline
//!
//! The pipeline never logs through global state of its own; it reports to a
//! [`PipelineObserver`] handed in at construction. [`TracingObserver`] is the
//! default sink, infrastructure adds metrics sinks, and
//! [`CompositeObserver`] fans out to several.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use yotei_domain::{impl_wire_name_conversions, IntentClassification, StrategyKind, YoteiError};

/// Request lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    Raw,
    IntentClassified,
    Extracted,
    Supplemented,
    Augmented,
    Ready,
    ExtractionFailed,
}

impl_wire_name_conversions!(PipelineStage {
    Raw => "raw",
    IntentClassified => "intent_classified",
    Extracted => "extracted",
    Supplemented => "supplemented",
    Augmented => "augmented",
    Ready => "ready",
    ExtractionFailed => "extraction_failed",
});

/// Receives pipeline events. Every method defaults to a no-op.
pub trait PipelineObserver: Send + Sync {
    fn on_stage(&self, _stage: PipelineStage) {}

    /// `fallback_cause` is set when the classifier could not answer.
    fn on_intent(&self, _classification: &IntentClassification, _fallback_cause: Option<&YoteiError>) {
    }

    fn on_strategy_failed(&self, _strategy: StrategyKind, _error: &YoteiError) {}

    fn on_extracted(&self, _strategy: StrategyKind, _accepted: usize, _dropped: usize) {}

    fn on_slot_dropped(&self, _reason: &str) {}

    fn on_supplement_step(&self, _step: &'static str, _before: usize, _after: usize) {}

    fn on_travel_buffers(&self, _inserted: usize) {}

    fn on_extraction_failed(&self, _error: &YoteiError) {}

    fn on_completed(&self, _stage: PipelineStage, _slots: usize, _elapsed: Duration) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Structured `tracing` events for every pipeline callback.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_stage(&self, stage: PipelineStage) {
        debug!(stage = %stage, "pipeline_stage");
    }

    fn on_intent(&self, classification: &IntentClassification, fallback_cause: Option<&YoteiError>) {
        match fallback_cause {
            Some(error) => warn!(
                intent = %classification.intent,
                error = %error,
                error_type = error.label(),
                "intent_classification_fallback"
            ),
            None => info!(
                intent = %classification.intent,
                confidence = classification.confidence,
                "intent_classified"
            ),
        }
    }

    fn on_strategy_failed(&self, strategy: StrategyKind, error: &YoteiError) {
        warn!(strategy = %strategy, error = %error, error_type = error.label(), "extraction_strategy_failed");
    }

    fn on_extracted(&self, strategy: StrategyKind, accepted: usize, dropped: usize) {
        info!(strategy = %strategy, accepted, dropped, "extraction_succeeded");
    }

    fn on_slot_dropped(&self, reason: &str) {
        debug!(reason, "candidate_slot_dropped");
    }

    fn on_supplement_step(&self, step: &'static str, before: usize, after: usize) {
        if before != after {
            debug!(step, before, after, "supplement_step_changed_slots");
        }
    }

    fn on_travel_buffers(&self, inserted: usize) {
        info!(inserted, "travel_buffers_inserted");
    }

    fn on_extraction_failed(&self, error: &YoteiError) {
        warn!(error = %error, error_type = error.label(), "extraction_failed");
    }

    fn on_completed(&self, stage: PipelineStage, slots: usize, elapsed: Duration) {
        let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        info!(stage = %stage, slots, duration_ms, "schedule_request_completed");
    }
}

/// Forwards every event to each inner observer in order.
#[derive(Default, Clone)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn PipelineObserver>>,
}

impl CompositeObserver {
    /// Fan out to `observers`, in order.
    pub fn new(observers: Vec<Arc<dyn PipelineObserver>>) -> Self {
        Self { observers }
    }

    /// Append one more observer.
    #[must_use]
    pub fn with(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observers.push(observer);
        self
    }
}

impl PipelineObserver for CompositeObserver {
    fn on_stage(&self, stage: PipelineStage) {
        self.observers.iter().for_each(|o| o.on_stage(stage));
    }

    fn on_intent(&self, classification: &IntentClassification, fallback_cause: Option<&YoteiError>) {
        self.observers.iter().for_each(|o| o.on_intent(classification, fallback_cause));
    }

    fn on_strategy_failed(&self, strategy: StrategyKind, error: &YoteiError) {
        self.observers.iter().for_each(|o| o.on_strategy_failed(strategy, error));
    }

    fn on_extracted(&self, strategy: StrategyKind, accepted: usize, dropped: usize) {
        self.observers.iter().for_each(|o| o.on_extracted(strategy, accepted, dropped));
    }

    fn on_slot_dropped(&self, reason: &str) {
        self.observers.iter().for_each(|o| o.on_slot_dropped(reason));
    }

    fn on_supplement_step(&self, step: &'static str, before: usize, after: usize) {
        self.observers.iter().for_each(|o| o.on_supplement_step(step, before, after));
    }

    fn on_travel_buffers(&self, inserted: usize) {
        self.observers.iter().for_each(|o| o.on_travel_buffers(inserted));
    }

    fn on_extraction_failed(&self, error: &YoteiError) {
        self.observers.iter().for_each(|o| o.on_extraction_failed(error));
    }

    fn on_completed(&self, stage: PipelineStage, slots: usize, elapsed: Duration) {
        self.observers.iter().for_each(|o| o.on_completed(stage, slots, elapsed));
    }
}
