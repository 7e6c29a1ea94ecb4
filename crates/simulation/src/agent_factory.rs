//! Agent Factory: spawns a market plus N traders from configuration.
//!
//! The market always takes id 0 and traders take ids `1..=N`, so ascending
//! id order steps the market first.

use std::fmt;
use std::str::FromStr;

use agents::{Actor, DirectMarket, MessageMarket, MessageTrader, TraderConfig, TraderCore};
use market::{Stock, StockConfig};
use types::ActorId;

use crate::Simulation;
use crate::config::ParallelizationConfig;
use crate::error::SimulationError;

/// Identity of the market actor in every spawned population.
pub const MARKET_ID: ActorId = ActorId(0);

/// Which trading protocol a population uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Protocol {
    /// Shared-state calls between market and traders.
    #[default]
    Direct,
    /// Envelopes through the engine.
    Message,
}

impl Protocol {
    /// Parallel settings under which this protocol's runs are reproducible.
    ///
    /// Direct-call actors mutate each other's state from inside `step`, so
    /// stepping them concurrently makes the outcome depend on scheduling.
    pub fn parallelization(self, requested: ParallelizationConfig) -> ParallelizationConfig {
        match self {
            Protocol::Direct => ParallelizationConfig::sequential(),
            Protocol::Message => requested,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Direct => write!(f, "direct"),
            Protocol::Message => write!(f, "message"),
        }
    }
}

impl FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "direct" => Ok(Protocol::Direct),
            "message" => Ok(Protocol::Message),
            other => Err(format!(
                "unknown protocol '{other}' (expected 'direct' or 'message')"
            )),
        }
    }
}

/// Everything needed to build one population.
#[derive(Debug, Clone)]
pub struct PopulationConfig {
    pub protocol: Protocol,
    /// Number of traders (the market comes on top).
    pub traders: usize,
    /// Base seed; `None` seeds every random source from the OS.
    pub seed: Option<u64>,
    pub stock: StockConfig,
    pub trader: TraderConfig,
    /// Let the direct-call market inform traders in parallel.
    pub parallel_inform: bool,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            protocol: Protocol::default(),
            traders: 999,
            seed: None,
            stock: StockConfig::default(),
            trader: TraderConfig::default(),
            parallel_inform: false,
        }
    }
}

impl PopulationConfig {
    pub fn new(protocol: Protocol, traders: usize) -> Self {
        Self {
            protocol,
            traders,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_parallel_inform(mut self, enabled: bool) -> Self {
        self.parallel_inform = enabled;
        self
    }
}

/// Result of spawning a population.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnResult {
    pub market: ActorId,
    pub trader_count: usize,
}

/// Per-trader seed mixed from the base seed and the trader's id.
pub fn trader_seed(seed: u64, id: ActorId) -> u64 {
    seed ^ id.0.wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

fn trader_core(config: &PopulationConfig, id: ActorId) -> TraderCore {
    match config.seed {
        Some(seed) => TraderCore::with_seed(&config.trader, trader_seed(seed, id)),
        None => TraderCore::new(&config.trader),
    }
}

fn stock(config: &PopulationConfig) -> Stock {
    match config.seed {
        Some(seed) => Stock::with_seed(config.stock.clone(), config.traders, seed),
        None => Stock::new(config.stock.clone(), config.traders),
    }
}

/// Build the market and its traders, market first.
pub fn build_population(config: &PopulationConfig) -> Vec<Box<dyn Actor>> {
    let trader_ids = (1..=config.traders as u64).map(ActorId);
    let mut actors: Vec<Box<dyn Actor>> = Vec::with_capacity(config.traders + 1);

    match config.protocol {
        Protocol::Message => {
            let ids: Vec<ActorId> = trader_ids.collect();
            actors.push(Box::new(MessageMarket::new(
                MARKET_ID,
                ids.clone(),
                stock(config),
            )));
            for id in ids {
                let core = trader_core(config, id);
                actors.push(Box::new(MessageTrader::new(id, MARKET_ID, core)));
            }
        }
        Protocol::Direct => {
            let mut market = DirectMarket::new(MARKET_ID, stock(config))
                .with_parallel_inform(config.parallel_inform);
            let traders: Vec<Box<dyn Actor>> = trader_ids
                .map(|id| {
                    let core = trader_core(config, id);
                    Box::new(market.spawn_trader(id, core)) as Box<dyn Actor>
                })
                .collect();
            actors.push(Box::new(market));
            actors.extend(traders);
        }
    }
    actors
}

/// Spawn a population into `sim`.
pub fn spawn_population(
    sim: &mut Simulation,
    config: &PopulationConfig,
) -> Result<SpawnResult, SimulationError> {
    for actor in build_population(config) {
        sim.add_actor(actor)?;
    }
    Ok(SpawnResult {
        market: MARKET_ID,
        trader_count: config.traders,
    })
}
