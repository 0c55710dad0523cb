//! Application context - dependency injection container

use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use yotei_core::{
    Clock, CompositeObserver, PipelineObserver, SchedulingPipeline, SystemClock, TimeReferenceResolver,
    TracingObserver,
};
use yotei_domain::{Result, ScheduleResponse, YoteiConfig};
use yotei_infra::{
    config, FunctionCallingStrategy, JsonReplyStrategy, OpenAIClient, OpenAIIntentModel,
    PipelineMetrics, PipelineStats,
};

/// Application context - the wired pipeline plus its metrics
pub struct AppContext {
    /// Validated configuration the context was built from.
    pub config: YoteiConfig,
    /// Fully wired pipeline.
    pub pipeline: SchedulingPipeline,
    /// Counters fed by the pipeline observer.
    pub metrics: Arc<PipelineMetrics>,
}

impl AppContext {
    /// Load configuration from the environment or a config file and wire
    /// everything up.
    pub fn new() -> Result<Self> {
        Self::new_with_config(config::load()?)
    }

    /// Wire up from an already loaded configuration.
    pub fn new_with_config(config: YoteiConfig) -> Result<Self> {
        Self::new_with_clock(config, Arc::new(SystemClock))
    }

    /// Build with an explicit clock. Tests use this to pin "today".
    pub fn new_with_clock(config: YoteiConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;

        let client = Arc::new(OpenAIClient::from_config(&config.llm)?);
        let metrics = Arc::new(PipelineMetrics::new());
        let observer = CompositeObserver::new(vec![
            Arc::new(TracingObserver) as Arc<dyn PipelineObserver>,
            metrics.clone() as Arc<dyn PipelineObserver>,
        ]);

        let pipeline = SchedulingPipeline::builder()
            .resolver(TimeReferenceResolver::from_timezone_name(clock, &config.pipeline.timezone)?)
            .intent_model(Arc::new(OpenAIIntentModel::new(
                client.clone(),
                config.llm.classifier_model.clone(),
            )))
            .strategy(Arc::new(FunctionCallingStrategy::new(
                client.clone(),
                config.llm.primary_model.clone(),
            )))
            .strategy(Arc::new(JsonReplyStrategy::new(client, config.llm.fallback_model.clone())))
            .call_timeout(Duration::from_secs(config.pipeline.call_timeout_secs))
            .travel(config.travel.clone())
            .observer(Arc::new(observer))
            .build()?;

        info!(
            primary_model = %config.llm.primary_model,
            fallback_model = %config.llm.fallback_model,
            classifier_model = %config.llm.classifier_model,
            timezone = %config.pipeline.timezone,
            travel_enabled = config.travel.enabled,
            "application context ready"
        );

        Ok(Self { config, pipeline, metrics })
    }

    /// Run one message through the pipeline.
    pub async fn process(&self, text: &str) -> ScheduleResponse {
        self.pipeline.process(text).await
    }

    /// Snapshot of the pipeline counters.
    pub fn stats(&self) -> PipelineStats {
        self.metrics.snapshot()
    }

    /// Log a final metrics summary. Nothing else needs explicit cleanup.
    pub fn shutdown(&self) {
        let stats = self.stats();
        info!(
            requests = stats.requests,
            succeeded = stats.succeeded,
            failed = stats.failed,
            classifier_fallbacks = stats.classifier_fallbacks,
            fallback_extractions = stats.fallback_extractions,
            p95_latency_ms = ?stats.p95_latency_ms,
            "shutdown called on AppContext"
        );
    }
}
