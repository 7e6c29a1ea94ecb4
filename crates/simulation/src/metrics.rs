//! MetricsHook - Built-in hook for aggregating round statistics.
//!
//! Collects per-round timings and envelope counts. The CLI uses it for its
//! round-timing report.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use types::Round;

use crate::hooks::{RoundContext, RoundHook};
use crate::runner::RoundStats;

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    /// Total iterations of the round loop.
    pub total_rounds: u64,
    /// Total envelopes collected from outboxes.
    pub total_envelopes: u64,
    /// Average envelopes collected per round.
    pub avg_envelopes_per_round: f64,
    /// Peak envelopes collected in a single round.
    pub peak_envelopes_per_round: u64,
    /// Sum of round durations.
    pub total_time: Duration,
    /// Average round duration.
    pub avg_round_time: Duration,
}

/// Built-in hook for collecting round metrics.
///
/// # Example
///
/// ```ignore
/// use simulation::{MetricsHook, Simulation, SimulationConfig};
/// use std::sync::Arc;
///
/// let metrics = Arc::new(MetricsHook::new());
/// let mut sim = Simulation::new(SimulationConfig::new(200));
/// sim.add_hook(metrics.clone());
/// sim.run()?;
///
/// for (round, elapsed) in metrics.round_timings() {
///     println!("Round {round} takes {} ms", elapsed.as_millis());
/// }
/// ```
pub struct MetricsHook {
    round_count: AtomicU64,
    envelope_count: AtomicU64,
    peak_envelopes: AtomicU64,
    total_nanos: AtomicU64,
    /// `(round, elapsed)` per iteration, bounded by `max_history`.
    timings: Mutex<Vec<(Round, Duration)>>,
    max_history: usize,
}

impl MetricsHook {
    /// Create a new metrics hook with default settings.
    pub fn new() -> Self {
        Self::with_max_history(10_000)
    }

    /// Create a metrics hook with custom history limit.
    pub fn with_max_history(max_history: usize) -> Self {
        Self {
            round_count: AtomicU64::new(0),
            envelope_count: AtomicU64::new(0),
            peak_envelopes: AtomicU64::new(0),
            total_nanos: AtomicU64::new(0),
            timings: Mutex::new(Vec::with_capacity(max_history.min(10_000))),
            max_history,
        }
    }

    /// Get a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let total_rounds = self.round_count.load(Ordering::Relaxed);
        let total_envelopes = self.envelope_count.load(Ordering::Relaxed);
        let total_time = Duration::from_nanos(self.total_nanos.load(Ordering::Relaxed));

        let (avg_envelopes, avg_time) = if total_rounds > 0 {
            (
                total_envelopes as f64 / total_rounds as f64,
                Duration::from_nanos(self.total_nanos.load(Ordering::Relaxed) / total_rounds),
            )
        } else {
            (0.0, Duration::ZERO)
        };

        MetricsSnapshot {
            total_rounds,
            total_envelopes,
            avg_envelopes_per_round: avg_envelopes,
            peak_envelopes_per_round: self.peak_envelopes.load(Ordering::Relaxed),
            total_time,
            avg_round_time: avg_time,
        }
    }

    /// Recorded `(round, elapsed)` pairs in execution order.
    pub fn round_timings(&self) -> Vec<(Round, Duration)> {
        self.timings.lock().clone()
    }

    /// Reset all metrics.
    pub fn reset(&self) {
        self.round_count.store(0, Ordering::Relaxed);
        self.envelope_count.store(0, Ordering::Relaxed);
        self.peak_envelopes.store(0, Ordering::Relaxed);
        self.total_nanos.store(0, Ordering::Relaxed);
        self.timings.lock().clear();
    }

    /// Update peak value atomically (CAS loop).
    fn update_peak(peak: &AtomicU64, value: u64) {
        let mut current = peak.load(Ordering::Relaxed);
        while value > current {
            match peak.compare_exchange_weak(current, value, Ordering::Relaxed, Ordering::Relaxed) {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }
    }
}

impl Default for MetricsHook {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundHook for MetricsHook {
    fn name(&self) -> &str {
        "Metrics"
    }

    fn on_round_end(&self, stats: &RoundStats, _ctx: &RoundContext) {
        self.round_count.fetch_add(1, Ordering::Relaxed);
        self.envelope_count
            .fetch_add(stats.envelopes_collected, Ordering::Relaxed);
        Self::update_peak(&self.peak_envelopes, stats.envelopes_collected);
        let nanos = u64::try_from(stats.elapsed.as_nanos()).unwrap_or(u64::MAX);
        self.total_nanos.fetch_add(nanos, Ordering::Relaxed);

        let mut timings = self.timings.lock();
        if timings.len() < self.max_history {
            timings.push((stats.round, stats.elapsed));
        }
    }
}
