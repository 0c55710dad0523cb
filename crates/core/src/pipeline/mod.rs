//! End-to-end scheduling pipeline

pub mod service;

pub use service::{SchedulingPipeline, SchedulingPipelineBuilder};
