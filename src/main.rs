//! Round Gym - Main binary
//!
//! Runs the market scenario: for every population size, a fresh market plus
//! that many traders are stepped through the round budget, and the time of
//! every round is reported on stdout.
//!
//! ```text
//! round-gym                                 # direct protocol, 999/9999/99999 traders
//! round-gym --protocol message --traders 50,500 --rounds 100 --seed 7
//! ```

mod config;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use simulation::{MetricsHook, Protocol, Simulation};
use tracing::info;
use tracing_subscriber::EnvFilter;

pub use config::ScenarioConfig;

/// Round Gym - Lock-step multi-actor market simulation
#[derive(Parser, Debug)]
#[command(name = "round-gym")]
#[command(about = "A lock-step multi-actor market simulation")]
#[command(version)]
struct Args {
    /// Trading protocol: direct or message
    #[arg(long, env = "GYM_PROTOCOL")]
    protocol: Option<Protocol>,

    /// Round budget per population
    #[arg(long, env = "GYM_ROUNDS")]
    rounds: Option<u64>,

    /// Comma-separated population sizes
    #[arg(long, env = "GYM_TRADERS", value_delimiter = ',')]
    traders: Option<Vec<usize>>,

    /// Base seed for reproducible runs
    #[arg(long, env = "GYM_SEED")]
    seed: Option<u64>,

    /// Disable parallel stepping
    #[arg(long, env = "GYM_SEQUENTIAL")]
    sequential: bool,

    /// Log every round at info level
    #[arg(long, short, env = "GYM_VERBOSE")]
    verbose: bool,
}

impl Args {
    /// Overlay command-line values on the defaults.
    fn into_config(self) -> ScenarioConfig {
        let defaults = ScenarioConfig::default();
        ScenarioConfig {
            protocol: self.protocol.unwrap_or(defaults.protocol),
            rounds: self.rounds.unwrap_or(defaults.rounds),
            trader_counts: self.traders.unwrap_or(defaults.trader_counts),
            seed: self.seed.or(defaults.seed),
            parallel: !self.sequential && defaults.parallel,
            verbose: self.verbose,
            ..defaults
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = args.into_config();

    let default_level = if config.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        protocol = %config.protocol,
        rounds = config.rounds,
        populations = ?config.trader_counts,
        "round gym starting"
    );

    for &traders in &config.trader_counts {
        run_population(&config, traders)
            .with_context(|| format!("population of {traders} traders failed"))?;
    }
    Ok(())
}

/// Build and run one population, then print its round timings.
fn run_population(config: &ScenarioConfig, traders: usize) -> anyhow::Result<()> {
    let mut sim = Simulation::new(config.simulation_config());
    simulation::spawn_population(&mut sim, &config.population(traders))?;

    let metrics = Arc::new(MetricsHook::with_max_history(config.rounds as usize));
    sim.add_hook(metrics.clone());

    println!(
        "Running {} protocol with {} traders for {} rounds",
        config.protocol, traders, config.rounds
    );
    let stats = sim.run()?;

    for (round, elapsed) in metrics.round_timings() {
        println!("Round {round} takes {} ms", elapsed.as_millis());
    }
    let snapshot = metrics.snapshot();
    println!(
        "Average per round: {:.3} ms ({} rounds, {} envelopes)",
        snapshot.avg_round_time.as_secs_f64() * 1000.0,
        stats.rounds_executed,
        stats.envelopes_sent
    );
    Ok(())
}
