//! Round hooks for observing the simulation lifecycle.
//!
//! Hooks are **observers**: they receive owned snapshots of engine state at
//! fixed points of every round and cannot modify the simulation.
//!
//! # Example
//!
//! ```ignore
//! use simulation::{RoundContext, RoundHook, RoundStats};
//! use std::sync::atomic::{AtomicU64, Ordering};
//!
//! struct EnvelopeCounter {
//!     count: AtomicU64,
//! }
//!
//! impl RoundHook for EnvelopeCounter {
//!     fn name(&self) -> &str { "EnvelopeCounter" }
//!
//!     fn on_round_end(&self, stats: &RoundStats, _ctx: &RoundContext) {
//!         self.count.fetch_add(stats.envelopes_collected, Ordering::Relaxed);
//!     }
//! }
//! ```

use std::sync::Arc;

use types::Round;

use crate::runner::{RoundStats, SimulationStats};

// ─────────────────────────────────────────────────────────────────────────────
// Hook Context
// ─────────────────────────────────────────────────────────────────────────────

/// Context passed to hooks at each lifecycle point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundContext {
    /// Round counter at the start of the iteration.
    pub round: Round,
    /// Registered actors.
    pub actor_count: usize,
    /// Envelopes waiting in the pending table.
    pub pending_envelopes: u64,
}

impl RoundContext {
    pub fn new(round: Round, actor_count: usize) -> Self {
        Self {
            round,
            actor_count,
            pending_envelopes: 0,
        }
    }

    pub fn with_pending(mut self, pending: u64) -> Self {
        self.pending_envelopes = pending;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// RoundHook Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Trait for simulation observers.
///
/// Use interior mutability (`Mutex`, atomics) for hook-owned state.
///
/// # Lifecycle
///
/// ```text
/// Simulation.step_round()
///   on_round_start()   before delivery
///   ... deliver, step, collect, advance ...
///   on_round_end()     with the finished round's stats
///
/// after the budget is exhausted
///   on_simulation_end()
/// ```
pub trait RoundHook: Send + Sync {
    /// Human-readable name for logging and debugging.
    fn name(&self) -> &str;

    /// Called before envelopes are delivered.
    #[allow(unused_variables)]
    fn on_round_start(&self, ctx: &RoundContext) {}

    /// Called once the round counter has advanced.
    #[allow(unused_variables)]
    fn on_round_end(&self, stats: &RoundStats, ctx: &RoundContext) {}

    /// Called once when `run` completes.
    #[allow(unused_variables)]
    fn on_simulation_end(&self, final_stats: &SimulationStats) {}
}

// ─────────────────────────────────────────────────────────────────────────────
// HookRunner
// ─────────────────────────────────────────────────────────────────────────────

/// Manages hook registration and sequential invocation.
///
/// Hooks are called in registration order.
#[derive(Default)]
pub struct HookRunner {
    hooks: Vec<Arc<dyn RoundHook>>,
}

impl HookRunner {
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Register a hook. Hooks are called in registration order.
    pub fn add(&mut self, hook: Arc<dyn RoundHook>) {
        self.hooks.push(hook);
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Get hook names for debugging.
    pub fn hook_names(&self) -> Vec<&str> {
        self.hooks.iter().map(|h| h.name()).collect()
    }

    pub fn on_round_start(&self, ctx: &RoundContext) {
        for hook in &self.hooks {
            hook.on_round_start(ctx);
        }
    }

    pub fn on_round_end(&self, stats: &RoundStats, ctx: &RoundContext) {
        for hook in &self.hooks {
            hook.on_round_end(stats, ctx);
        }
    }

    pub fn on_simulation_end(&self, final_stats: &SimulationStats) {
        for hook in &self.hooks {
            hook.on_simulation_end(final_stats);
        }
    }
}

impl std::fmt::Debug for HookRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRunner")
            .field("hooks", &self.hook_names())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Built-in Hooks
// ─────────────────────────────────────────────────────────────────────────────

/// A no-op hook useful for testing.
#[derive(Debug, Default)]
pub struct NoOpHook;

impl RoundHook for NoOpHook {
    fn name(&self) -> &str {
        "NoOp"
    }
}
