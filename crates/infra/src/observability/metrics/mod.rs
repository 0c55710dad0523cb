//! Metrics collection modules

pub mod pipeline;

pub use pipeline::{PipelineMetrics, PipelineStats};
