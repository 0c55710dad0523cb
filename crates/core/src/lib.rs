//! # Yotei Core
//!
//! Scheduling logic with no network or filesystem dependencies.
//!
//! This crate contains:
//! - Time reference resolution and Japanese date/time pattern rules
//! - Port interfaces for intent models and extraction strategies (traits)
//! - The deterministic supplementer and travel-buffer augmenter
//! - The pipeline that ties them together
//!
//! ## Architecture Principles
//! - Only depends on `yotei-domain`
//! - Model access goes through [`IntentModel`] and [`ExtractionStrategy`]
//! - Everything after extraction is pure and deterministic

pub mod extraction;
pub mod intent;
pub mod observer;
pub mod pipeline;
pub mod supplement;
pub mod time_reference;
pub mod travel;
pub mod utils;

pub use extraction::{ExtractionRequest, ExtractionStrategy, StructuredExtractor};
pub use intent::{IntentClassifier, IntentModel, IntentOutcome};
pub use observer::{
    CompositeObserver, NoopObserver, PipelineObserver, PipelineStage, TracingObserver,
};
pub use pipeline::{SchedulingPipeline, SchedulingPipelineBuilder};
pub use supplement::{SupplementContext, SupplementStep, Supplementer};
pub use time_reference::{Clock, FixedClock, SystemClock, TimeReference, TimeReferenceResolver};
pub use travel::{TravelAugmenter, TravelTimeEstimator};
// Re-export utilities
pub use utils::patterns;
