//! Simulation crate: the lock-step round engine for Round Gym.
//!
//! This crate provides the simulation runner that coordinates:
//! - Round-based event loop with deferred envelope delivery
//! - Actor stepping (parallel with the `parallel` feature)
//! - Undeliverable-envelope handling
//! - Hook-based observation
//! - Population spawning for the two market protocols
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │            Simulation.step_round()          │
//! │                                             │
//! │  1. Hook: on_round_start                    │
//! │  2. Deliver pending envelopes (id order)    │
//! │  3. actor.step() for every actor            │
//! │  4. Drain outboxes into the pending table   │
//! │  5. Advance round by the minimum advance    │
//! │  6. Hook: on_round_end                      │
//! │                                             │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use simulation::{MetricsHook, PopulationConfig, Protocol, Simulation, SimulationConfig};
//! use std::sync::Arc;
//!
//! let mut sim = Simulation::new(SimulationConfig::new(200));
//! simulation::spawn_population(&mut sim, &PopulationConfig::new(Protocol::Message, 999))?;
//! let metrics = Arc::new(MetricsHook::new());
//! sim.add_hook(metrics.clone());
//!
//! sim.run()?;
//! println!("Avg round: {:?}", metrics.snapshot().avg_round_time);
//! ```

pub mod agent_factory;
pub mod config;
mod error;
mod hooks;
mod metrics;
mod runner;

pub use agent_factory::{
    MARKET_ID, PopulationConfig, Protocol, SpawnResult, build_population, spawn_population,
};
pub use config::{ParallelizationConfig, SimulationConfig, UndeliverablePolicy};
pub use error::SimulationError;
pub use hooks::{HookRunner, NoOpHook, RoundContext, RoundHook};
pub use metrics::{MetricsHook, MetricsSnapshot};
pub use runner::{RoundStats, Simulation, SimulationStats};
