//! Observability infrastructure
//!
//! In-process pipeline metrics exposed as a serializable snapshot.
//!
//! ## Design Principles
//!
//! 1. **Lock-free counters**: independent `AtomicU64`s with relaxed ordering
//! 2. **Poison recovery**: the latency buffer mutex recovers from poisoning
//!    with a warning instead of panicking
//! 3. **Ring buffer**: `VecDeque` with O(1) eviction for latency samples

pub mod metrics;

pub use metrics::{PipelineMetrics, PipelineStats};
