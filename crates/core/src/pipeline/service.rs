//! Scheduling pipeline - classify, extract, supplement, augment

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info_span, Instrument};
use uuid::Uuid;
use yotei_domain::constants::{DEFAULT_LLM_TIMEOUT_SECS, DEFAULT_TIMEZONE};
use yotei_domain::{Result, ScheduleResponse, TravelConfig, YoteiError};

use crate::extraction::{ExtractionStrategy, StructuredExtractor};
use crate::intent::{IntentClassifier, IntentModel};
use crate::observer::{PipelineObserver, PipelineStage, TracingObserver};
use crate::supplement::Supplementer;
use crate::time_reference::{SystemClock, TimeReference, TimeReferenceResolver};
use crate::travel::TravelAugmenter;
use crate::utils::patterns::normalize;

/// One message in, one [`ScheduleResponse`] out.
pub struct SchedulingPipeline {
    resolver: TimeReferenceResolver,
    classifier: IntentClassifier,
    extractor: StructuredExtractor,
    supplementer: Supplementer,
    augmenter: TravelAugmenter,
    observer: Arc<dyn PipelineObserver>,
}

impl SchedulingPipeline {
    /// Start building a pipeline.
    pub fn builder() -> SchedulingPipelineBuilder {
        SchedulingPipelineBuilder::default()
    }

    /// Resolver used to sample "now" for each message.
    pub const fn resolver(&self) -> &TimeReferenceResolver {
        &self.resolver
    }

    /// Process `text` against the current time.
    pub async fn process(&self, text: &str) -> ScheduleResponse {
        let reference = self.resolver.resolve();
        self.process_at(text, &reference).await
    }

    /// Process `text` against a fixed time reference.
    pub async fn process_at(&self, text: &str, reference: &TimeReference) -> ScheduleResponse {
        let request_id = Uuid::new_v4();
        let span = info_span!(
            "schedule_request",
            %request_id,
            today = %reference.today(),
            chars = text.chars().count()
        );
        self.run(text, reference).instrument(span).await
    }

    async fn run(&self, text: &str, reference: &TimeReference) -> ScheduleResponse {
        let started = Instant::now();
        let observer = self.observer.as_ref();
        observer.on_stage(PipelineStage::Raw);

        if text.trim().is_empty() {
            return self.fail(YoteiError::InvalidInput("empty message".into()), started);
        }

        let outcome = self.classifier.classify(text, reference).await;
        observer.on_intent(&outcome.classification, outcome.fallback_cause.as_ref());
        observer.on_stage(PipelineStage::IntentClassified);
        let intent = outcome.classification.intent;

        let extracted = match self.extractor.extract(text, intent, reference, observer).await {
            Ok(extracted) => extracted,
            Err(error) => return self.fail(error, started),
        };
        observer.on_stage(PipelineStage::Extracted);

        let supplemented =
            self.supplementer.supplement(extracted.result, text, reference.today(), observer);
        observer.on_stage(PipelineStage::Supplemented);

        let (augmented, inserted) = self.augmenter.augment(supplemented, &normalize(text));
        if inserted > 0 {
            observer.on_travel_buffers(inserted);
        }
        observer.on_stage(PipelineStage::Augmented);

        observer.on_stage(PipelineStage::Ready);
        observer.on_completed(PipelineStage::Ready, augmented.slots.len(), started.elapsed());
        ScheduleResponse::Extracted(augmented)
    }

    fn fail(&self, error: YoteiError, started: Instant) -> ScheduleResponse {
        self.observer.on_extraction_failed(&error);
        self.observer.on_stage(PipelineStage::ExtractionFailed);
        self.observer.on_completed(PipelineStage::ExtractionFailed, 0, started.elapsed());
        ScheduleResponse::guidance()
    }
}

/// Builder for [`SchedulingPipeline`].
pub struct SchedulingPipelineBuilder {
    resolver: Option<TimeReferenceResolver>,
    intent_model: Option<Arc<dyn IntentModel>>,
    strategies: Vec<Arc<dyn ExtractionStrategy>>,
    call_timeout: Duration,
    travel: TravelConfig,
    supplementer: Option<Supplementer>,
    observer: Arc<dyn PipelineObserver>,
}

impl Default for SchedulingPipelineBuilder {
    fn default() -> Self {
        Self {
            resolver: None,
            intent_model: None,
            strategies: Vec::new(),
            call_timeout: Duration::from_secs(DEFAULT_LLM_TIMEOUT_SECS),
            travel: TravelConfig::default(),
            supplementer: None,
            observer: Arc::new(TracingObserver),
        }
    }
}

impl SchedulingPipelineBuilder {
    /// Time source; defaults to the system clock in `Asia/Tokyo`.
    pub fn resolver(mut self, resolver: TimeReferenceResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Model behind the intent classifier. Required.
    pub fn intent_model(mut self, model: Arc<dyn IntentModel>) -> Self {
        self.intent_model = Some(model);
        self
    }

    /// Append an extraction strategy; strategies run in insertion order.
    pub fn strategy(mut self, strategy: Arc<dyn ExtractionStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Deadline for each model call.
    pub fn call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Travel buffer policy.
    pub fn travel(mut self, travel: TravelConfig) -> Self {
        self.travel = travel;
        self
    }

    /// Replace the standard supplement steps.
    pub fn supplementer(mut self, supplementer: Supplementer) -> Self {
        self.supplementer = Some(supplementer);
        self
    }

    /// Stage event sink; defaults to [`TracingObserver`].
    pub fn observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// # Errors
    /// `YoteiError::Config` when no intent model or strategy was supplied,
    /// or the call timeout is zero.
    pub fn build(self) -> Result<SchedulingPipeline> {
        let model = self
            .intent_model
            .ok_or_else(|| YoteiError::Config("pipeline requires an intent model".into()))?;
        if self.strategies.is_empty() {
            return Err(YoteiError::Config(
                "pipeline requires at least one extraction strategy".into(),
            ));
        }
        if self.call_timeout.is_zero() {
            return Err(YoteiError::Config("call timeout must be greater than zero".into()));
        }
        let resolver = match self.resolver {
            Some(resolver) => resolver,
            None => TimeReferenceResolver::from_timezone_name(Arc::new(SystemClock), DEFAULT_TIMEZONE)?,
        };

        Ok(SchedulingPipeline {
            resolver,
            classifier: IntentClassifier::new(model, self.call_timeout),
            extractor: StructuredExtractor::new(self.strategies, self.call_timeout),
            supplementer: self.supplementer.unwrap_or_default(),
            augmenter: TravelAugmenter::new(self.travel),
            observer: self.observer,
        })
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use yotei_domain::{IntentClassification, RawExtraction, StrategyKind};

    use super::*;
    use crate::extraction::ExtractionRequest;

    struct NeverCalled;

    #[async_trait]
    impl IntentModel for NeverCalled {
        async fn classify(&self, _text: &str, _reference: &TimeReference) -> Result<IntentClassification> {
            Err(YoteiError::Internal("should not be called".into()))
        }
    }

    #[async_trait]
    impl ExtractionStrategy for NeverCalled {
        fn kind(&self) -> StrategyKind {
            StrategyKind::Primary
        }

        async fn extract(&self, _request: &ExtractionRequest<'_>) -> Result<RawExtraction> {
            Err(YoteiError::Internal("should not be called".into()))
        }
    }

    #[test]
    fn build_requires_models() {
        assert!(matches!(SchedulingPipeline::builder().build(), Err(YoteiError::Config(_))));
        let missing_strategy = SchedulingPipeline::builder().intent_model(Arc::new(NeverCalled)).build();
        assert!(matches!(missing_strategy, Err(YoteiError::Config(_))));
    }

    #[tokio::test]
    async fn blank_message_returns_guidance() {
        let pipeline = SchedulingPipeline::builder()
            .intent_model(Arc::new(NeverCalled))
            .strategy(Arc::new(NeverCalled))
            .build()
            .unwrap();

        assert_eq!(pipeline.process("   ").await, ScheduleResponse::guidance());
    }
}
