//! Pipeline metrics
//!
//! A [`PipelineObserver`] that counts requests, outcomes and supplementer
//! activity, and keeps the last [`LATENCY_SAMPLES`] request durations for
//! percentile reporting.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use serde::Serialize;
use yotei_core::{PipelineObserver, PipelineStage};
use yotei_domain::{IntentClassification, StrategyKind, YoteiError};

/// Ring buffer size for request latencies.
pub const LATENCY_SAMPLES: usize = 1000;

/// Point-in-time view of [`PipelineMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PipelineStats {
    /// Messages received.
    pub requests: u64,
    /// Messages answered with slots (possibly none).
    pub succeeded: u64,
    /// Requests answered with the guidance message.
    pub failed: u64,
    /// Times the default intent was used.
    pub classifier_fallbacks: u64,
    /// Successful primary strategy runs.
    pub primary_extractions: u64,
    /// Successful fallback strategy runs.
    pub fallback_extractions: u64,
    /// Individual strategy failures, including timeouts.
    pub strategy_failures: u64,
    /// Model candidates rejected by validation.
    pub candidates_dropped: u64,
    /// Slot-count changes made by supplement steps (added plus removed).
    pub supplement_changes: u64,
    /// Travel buffer slots inserted.
    pub travel_buffers: u64,
    /// Slots returned to callers.
    pub slots_emitted: u64,
    /// Median latency over the recent window.
    pub p50_latency_ms: Option<u64>,
    /// 95th percentile latency over the recent window.
    pub p95_latency_ms: Option<u64>,
}

/// Thread-safe pipeline counters.
#[derive(Debug)]
pub struct PipelineMetrics {
    requests: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    classifier_fallbacks: AtomicU64,
    primary_extractions: AtomicU64,
    fallback_extractions: AtomicU64,
    strategy_failures: AtomicU64,
    candidates_dropped: AtomicU64,
    supplement_changes: AtomicU64,
    travel_buffers: AtomicU64,
    slots_emitted: AtomicU64,
    latencies_ms: Mutex<VecDeque<u64>>,
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineMetrics {
    /// Zeroed counters and an empty latency window.
    pub fn new() -> Self {
        Self {
            requests: AtomicU64::new(0),
            succeeded: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            classifier_fallbacks: AtomicU64::new(0),
            primary_extractions: AtomicU64::new(0),
            fallback_extractions: AtomicU64::new(0),
            strategy_failures: AtomicU64::new(0),
            candidates_dropped: AtomicU64::new(0),
            supplement_changes: AtomicU64::new(0),
            travel_buffers: AtomicU64::new(0),
            slots_emitted: AtomicU64::new(0),
            latencies_ms: Mutex::new(VecDeque::with_capacity(LATENCY_SAMPLES)),
        }
    }

    /// Point-in-time copy of every counter.
    pub fn snapshot(&self) -> PipelineStats {
        let (p50_latency_ms, p95_latency_ms) = self.latency_percentiles();
        PipelineStats {
            requests: self.requests.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            classifier_fallbacks: self.classifier_fallbacks.load(Ordering::Relaxed),
            primary_extractions: self.primary_extractions.load(Ordering::Relaxed),
            fallback_extractions: self.fallback_extractions.load(Ordering::Relaxed),
            strategy_failures: self.strategy_failures.load(Ordering::Relaxed),
            candidates_dropped: self.candidates_dropped.load(Ordering::Relaxed),
            supplement_changes: self.supplement_changes.load(Ordering::Relaxed),
            travel_buffers: self.travel_buffers.load(Ordering::Relaxed),
            slots_emitted: self.slots_emitted.load(Ordering::Relaxed),
            p50_latency_ms,
            p95_latency_ms,
        }
    }

    fn record_latency(&self, elapsed: Duration) {
        let ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        let mut samples = match self.latencies_ms.lock() {
            Ok(guard) => guard,
            Err(poison_err) => {
                tracing::warn!(
                    metric = "PipelineMetrics::latencies_ms",
                    "Mutex poisoned during latency recording, recovering data"
                );
                poison_err.into_inner()
            }
        };
        samples.push_back(ms);
        if samples.len() > LATENCY_SAMPLES {
            samples.pop_front();
        }
    }

    fn latency_percentiles(&self) -> (Option<u64>, Option<u64>) {
        let mut sorted: Vec<u64> = match self.latencies_ms.lock() {
            Ok(guard) => guard.iter().copied().collect(),
            Err(poison_err) => poison_err.into_inner().iter().copied().collect(),
        };
        if sorted.is_empty() {
            return (None, None);
        }
        sorted.sort_unstable();
        let at = |p: f64| {
            let index = ((sorted.len() - 1) as f64 * p).round() as usize;
            sorted[index.min(sorted.len() - 1)]
        };
        (Some(at(0.50)), Some(at(0.95)))
    }
}

fn bump(counter: &AtomicU64, by: usize) {
    counter.fetch_add(u64::try_from(by).unwrap_or(u64::MAX), Ordering::Relaxed);
}

impl PipelineObserver for PipelineMetrics {
    fn on_stage(&self, stage: PipelineStage) {
        if stage == PipelineStage::Raw {
            bump(&self.requests, 1);
        }
    }

    fn on_intent(&self, _classification: &IntentClassification, fallback_cause: Option<&YoteiError>) {
        if fallback_cause.is_some() {
            bump(&self.classifier_fallbacks, 1);
        }
    }

    fn on_strategy_failed(&self, _strategy: StrategyKind, _error: &YoteiError) {
        bump(&self.strategy_failures, 1);
    }

    fn on_extracted(&self, strategy: StrategyKind, _accepted: usize, dropped: usize) {
        match strategy {
            StrategyKind::Primary => bump(&self.primary_extractions, 1),
            StrategyKind::Fallback => bump(&self.fallback_extractions, 1),
        }
        bump(&self.candidates_dropped, dropped);
    }

    fn on_supplement_step(&self, _step: &'static str, before: usize, after: usize) {
        bump(&self.supplement_changes, before.abs_diff(after));
    }

    fn on_travel_buffers(&self, inserted: usize) {
        bump(&self.travel_buffers, inserted);
    }

    fn on_completed(&self, stage: PipelineStage, slots: usize, elapsed: Duration) {
        match stage {
            PipelineStage::ExtractionFailed => bump(&self.failed, 1),
            _ => {
                bump(&self.succeeded, 1);
                bump(&self.slots_emitted, slots);
            }
        }
        self.record_latency(elapsed);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn counts_a_successful_request() {
        let metrics = PipelineMetrics::new();

        metrics.on_stage(PipelineStage::Raw);
        metrics.on_extracted(StrategyKind::Fallback, 2, 1);
        metrics.on_supplement_step("explicit_date_range", 2, 5);
        metrics.on_supplement_step("finalize", 5, 4);
        metrics.on_travel_buffers(2);
        metrics.on_completed(PipelineStage::Ready, 6, Duration::from_millis(40));

        let stats = metrics.snapshot();
        assert_eq!(stats.requests, 1);
        assert_eq!(stats.succeeded, 1);
        assert_eq!(stats.fallback_extractions, 1);
        assert_eq!(stats.candidates_dropped, 1);
        assert_eq!(stats.supplement_changes, 4);
        assert_eq!(stats.travel_buffers, 2);
        assert_eq!(stats.slots_emitted, 6);
        assert_eq!(stats.p50_latency_ms, Some(40));
    }

    #[test]
    fn counts_failures_and_fallbacks() {
        let metrics = PipelineMetrics::new();
        let timeout = YoteiError::Timeout("classifier".into());

        metrics.on_intent(&IntentClassification::fallback(), Some(&timeout));
        metrics.on_strategy_failed(StrategyKind::Primary, &timeout);
        metrics.on_strategy_failed(StrategyKind::Fallback, &timeout);
        metrics.on_completed(PipelineStage::ExtractionFailed, 0, Duration::ZERO);

        let stats = metrics.snapshot();
        assert_eq!(stats.classifier_fallbacks, 1);
        assert_eq!(stats.strategy_failures, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.succeeded, 0);
    }

    #[test]
    fn percentiles_follow_the_samples() {
        let metrics = PipelineMetrics::new();
        assert_eq!(metrics.snapshot().p95_latency_ms, None);

        for ms in 1..=100 {
            metrics.record_latency(Duration::from_millis(ms));
        }

        let stats = metrics.snapshot();
        assert_eq!(stats.p50_latency_ms, Some(51));
        assert_eq!(stats.p95_latency_ms, Some(95));
    }

    #[test]
    fn latency_buffer_is_bounded() {
        let metrics = PipelineMetrics::new();
        for _ in 0..(LATENCY_SAMPLES + 10) {
            metrics.record_latency(Duration::from_millis(1));
        }
        assert_eq!(metrics.latencies_ms.lock().unwrap().len(), LATENCY_SAMPLES);
    }

    #[test]
    fn concurrent_requests_are_all_counted() {
        let metrics = Arc::new(PipelineMetrics::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let metrics = Arc::clone(&metrics);
                thread::spawn(move || {
                    for _ in 0..100 {
                        metrics.on_stage(PipelineStage::Raw);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(metrics.snapshot().requests, 800);
    }
}
