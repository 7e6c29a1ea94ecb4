//! Simulation configuration options.

use types::Round;

/// What the engine does with envelopes addressed to an unregistered actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UndeliverablePolicy {
    /// Discard at collection time, log a warning and count it in the stats.
    #[default]
    Drop,
    /// Abort the run with [`crate::SimulationError::UndeliverableEnvelope`].
    Fail,
}

/// Runtime switches for the parallel phases.
///
/// Only takes effect when the crate is built with the `parallel` feature;
/// otherwise every phase runs sequentially regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelizationConfig {
    /// Step actors in parallel within a round.
    pub parallel_step: bool,
}

impl Default for ParallelizationConfig {
    fn default() -> Self {
        Self {
            parallel_step: true,
        }
    }
}

impl ParallelizationConfig {
    /// Every phase sequential.
    pub fn sequential() -> Self {
        Self {
            parallel_step: false,
        }
    }
}

/// Configuration for the simulation.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Round budget: the run stops once the round counter reaches it.
    pub max_rounds: Round,

    /// Parallel execution switches.
    pub parallelization: ParallelizationConfig,

    /// Handling of envelopes sent to unknown identities.
    pub undeliverable: UndeliverablePolicy,

    /// Enable verbose logging (per-round `info!` instead of `debug!`).
    pub verbose: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_rounds: 200,
            parallelization: ParallelizationConfig::default(),
            undeliverable: UndeliverablePolicy::default(),
            verbose: false,
        }
    }
}

impl SimulationConfig {
    /// Create a configuration with the given round budget.
    pub fn new(max_rounds: Round) -> Self {
        Self {
            max_rounds,
            ..Default::default()
        }
    }

    /// Set the round budget.
    pub fn with_max_rounds(mut self, max_rounds: Round) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Set the parallelization switches.
    pub fn with_parallelization(mut self, parallelization: ParallelizationConfig) -> Self {
        self.parallelization = parallelization;
        self
    }

    /// Force every phase to run sequentially.
    pub fn sequential(self) -> Self {
        self.with_parallelization(ParallelizationConfig::sequential())
    }

    /// Set the undeliverable-envelope policy.
    pub fn with_undeliverable_policy(mut self, policy: UndeliverablePolicy) -> Self {
        self.undeliverable = policy;
        self
    }

    /// Enable verbose mode.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}
