//! Central configuration for the Round Gym scenario.
//!
//! All scenario parameters are defined here for easy tuning.

use agents::TraderConfig;
use market::StockConfig;
use simulation::{ParallelizationConfig, PopulationConfig, Protocol, SimulationConfig};
use types::Round;

/// Master configuration for one invocation of the binary.
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    // ─────────────────────────────────────────────────────────────────────────
    // Simulation Control
    // ─────────────────────────────────────────────────────────────────────────
    /// Protocol every population uses.
    pub protocol: Protocol,
    /// Round budget per population.
    pub rounds: Round,
    /// Population sizes to run, one fresh market each.
    pub trader_counts: Vec<usize>,
    /// Base seed (`None` = OS entropy).
    pub seed: Option<u64>,
    /// Step actors in parallel where the protocol allows it.
    pub parallel: bool,
    /// Enable verbose logging.
    pub verbose: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Market Parameters
    // ─────────────────────────────────────────────────────────────────────────
    pub stock: StockConfig,
    pub trader: TraderConfig,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            protocol: Protocol::Direct,
            rounds: 200,
            trader_counts: vec![999, 9_999, 99_999],
            seed: None,
            parallel: true,
            verbose: false,
            stock: StockConfig::default(),
            trader: TraderConfig::default(),
        }
    }
}

impl ScenarioConfig {
    /// Engine configuration for every population in this scenario.
    pub fn simulation_config(&self) -> SimulationConfig {
        let requested = if self.parallel {
            ParallelizationConfig::default()
        } else {
            ParallelizationConfig::sequential()
        };
        SimulationConfig::new(self.rounds)
            .with_parallelization(self.protocol.parallelization(requested))
            .with_verbose(self.verbose)
    }

    /// Population configuration for `traders` traders.
    pub fn population(&self, traders: usize) -> PopulationConfig {
        PopulationConfig {
            protocol: self.protocol,
            traders,
            seed: self.seed,
            stock: self.stock.clone(),
            trader: self.trader.clone(),
            parallel_inform: self.parallel,
        }
    }
}
