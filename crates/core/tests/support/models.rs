//! Scripted implementations of the model ports

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use yotei_core::{ExtractionRequest, ExtractionStrategy, IntentModel, PipelineObserver, PipelineStage, TimeReference};
use yotei_domain::{
    CandidateSlot, IntentClassification, RawExtraction, Result as DomainResult, StrategyKind,
    TaskType, YoteiError,
};

/// Intent model that always answers the same way.
#[derive(Clone)]
pub struct MockIntentModel {
    answer: DomainResult<IntentClassification>,
}

impl MockIntentModel {
    pub fn answering(intent: TaskType) -> Self {
        Self { answer: Ok(IntentClassification::new(intent, 0.9, "scripted")) }
    }

    pub fn failing() -> Self {
        Self { answer: Err(YoteiError::Network("connection refused".into())) }
    }
}

#[async_trait]
impl IntentModel for MockIntentModel {
    async fn classify(&self, _text: &str, _reference: &TimeReference) -> DomainResult<IntentClassification> {
        self.answer.clone()
    }
}

/// Extraction strategy returning a fixed reply and counting calls.
pub struct ScriptedStrategy {
    kind: StrategyKind,
    reply: DomainResult<RawExtraction>,
    calls: AtomicUsize,
    last_intent: Mutex<Option<TaskType>>,
}

impl ScriptedStrategy {
    pub fn replying(kind: StrategyKind, reply: RawExtraction) -> Arc<Self> {
        Arc::new(Self { kind, reply: Ok(reply), calls: AtomicUsize::new(0), last_intent: Mutex::new(None) })
    }

    pub fn failing(kind: StrategyKind) -> Arc<Self> {
        Arc::new(Self {
            kind,
            reply: Err(YoteiError::Llm("model returned no structured reply".into())),
            calls: AtomicUsize::new(0),
            last_intent: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_intent(&self) -> Option<TaskType> {
        *self.last_intent.lock().unwrap()
    }
}

#[async_trait]
impl ExtractionStrategy for ScriptedStrategy {
    fn kind(&self) -> StrategyKind {
        self.kind
    }

    async fn extract(&self, request: &ExtractionRequest<'_>) -> DomainResult<RawExtraction> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_intent.lock().unwrap() = Some(request.intent);
        self.reply.clone()
    }
}

/// Observer that records every stage it sees.
#[derive(Default)]
pub struct RecordingObserver {
    stages: Mutex<Vec<PipelineStage>>,
}

impl RecordingObserver {
    pub fn stages(&self) -> Vec<PipelineStage> {
        self.stages.lock().unwrap().clone()
    }
}

impl PipelineObserver for RecordingObserver {
    fn on_stage(&self, stage: PipelineStage) {
        self.stages.lock().unwrap().push(stage);
    }
}

/// Candidate slot with optional times.
pub fn candidate(date: &str, time: Option<&str>, end_time: Option<&str>) -> CandidateSlot {
    CandidateSlot {
        date: Some(date.to_string()),
        time: time.map(ToString::to_string),
        end_time: end_time.map(ToString::to_string),
        ..CandidateSlot::default()
    }
}

pub fn reply(task_type: TaskType, dates: Vec<CandidateSlot>) -> RawExtraction {
    RawExtraction { task_type: Some(task_type.to_string()), dates, ..RawExtraction::default() }
}
