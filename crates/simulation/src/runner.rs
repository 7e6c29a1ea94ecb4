//! Simulation runner implementing the lock-step round loop.
//!
//! The simulation owns the actors, the pending-delivery table and the round
//! counter. Every iteration of the loop runs four phases:
//!
//! 1. **Delivery**: each actor's pending queue (envelopes addressed to it in
//!    the previous round) is appended to its mailbox, in ascending id order.
//! 2. **Step**: every actor's `step` runs exactly once. With the `parallel`
//!    feature this phase fans out over rayon; no actor can observe another's
//!    output because delivery already happened.
//! 3. **Collection**: outboxes are drained and merged into the pending table
//!    in ascending sender order, so cross-sender ordering never depends on
//!    thread scheduling.
//! 4. **Advance**: the round counter moves by the smallest advance any actor
//!    returned.
//!
//! An envelope sent in round R is therefore delivered at the start of the next
//! iteration and never within R itself.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use agents::{Actor, Outbox};
use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, info, warn};
use types::{ActorId, Envelope, Round, RoundAdvance};

use crate::config::{SimulationConfig, UndeliverablePolicy};
use crate::error::SimulationError;
use crate::hooks::{HookRunner, RoundContext, RoundHook};

/// Per-actor output of the step phase: `(id, step result, drained outbox)`.
type StepOutput = (ActorId, Result<RoundAdvance, agents::ActorError>, Outbox);

/// Cumulative statistics about the simulation state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationStats {
    /// Current round counter.
    pub round: Round,

    /// Iterations of the round loop executed.
    pub rounds_executed: u64,

    /// Envelopes collected from outboxes into the pending table.
    pub envelopes_sent: u64,

    /// Envelopes moved from the pending table into mailboxes.
    pub envelopes_delivered: u64,

    /// Envelopes discarded because their destination is not registered.
    pub envelopes_dropped: u64,
}

/// Statistics for a single iteration of the round loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundStats {
    /// Round counter when the iteration started.
    pub round: Round,

    /// Rounds the counter moved by (0 only for an empty population).
    pub advance: u64,

    /// Actors whose `step` ran.
    pub actors_stepped: usize,

    /// Envelopes delivered into mailboxes.
    pub envelopes_delivered: u64,

    /// Envelopes collected from outboxes.
    pub envelopes_collected: u64,

    /// Envelopes dropped as undeliverable.
    pub envelopes_dropped: u64,

    /// Wall-clock time of the iteration.
    pub elapsed: Duration,
}

/// The main simulation runner.
///
/// Actors are wrapped in `Mutex` so the step phase can run them in parallel;
/// each actor is locked by exactly one thread at a time. `actors` and `ids`
/// are kept sorted by id.
pub struct Simulation {
    /// Configuration for this simulation.
    config: SimulationConfig,

    /// Registered actors, sorted by id.
    actors: Vec<Mutex<Box<dyn Actor>>>,

    /// Ids of `actors`, same order.
    ids: Vec<ActorId>,

    /// Envelopes collected last round, keyed by destination.
    pending: HashMap<ActorId, VecDeque<Envelope>>,

    /// Current round.
    round: Round,

    /// Simulation statistics.
    stats: SimulationStats,

    /// Hook runner for round observers.
    hooks: HookRunner,
}

impl Simulation {
    /// Create an empty simulation with the given configuration.
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            actors: Vec::new(),
            ids: Vec::new(),
            pending: HashMap::new(),
            round: 0,
            stats: SimulationStats::default(),
            hooks: HookRunner::new(),
        }
    }

    /// Create a simulation with default config.
    pub fn with_defaults() -> Self {
        Self::new(SimulationConfig::default())
    }

    /// Create a simulation and register a whole population.
    pub fn with_actors(
        config: SimulationConfig,
        actors: impl IntoIterator<Item = Box<dyn Actor>>,
    ) -> Result<Self, SimulationError> {
        let mut sim = Self::new(config);
        for actor in actors {
            sim.add_actor(actor)?;
        }
        Ok(sim)
    }

    /// Register an actor. Identities must be unique.
    pub fn add_actor(&mut self, actor: Box<dyn Actor>) -> Result<(), SimulationError> {
        let id = actor.id();
        match self.ids.binary_search(&id) {
            Ok(_) => Err(SimulationError::DuplicateActor(id)),
            Err(pos) => {
                self.ids.insert(pos, id);
                self.actors.insert(pos, Mutex::new(actor));
                Ok(())
            }
        }
    }

    /// Register a hook. Hooks are invoked in registration order.
    pub fn add_hook(&mut self, hook: Arc<dyn RoundHook>) {
        self.hooks.add(hook);
    }

    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    /// Get the current round.
    pub fn current_round(&self) -> Round {
        self.round
    }

    pub fn max_rounds(&self) -> Round {
        self.config.max_rounds
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    pub fn has_actor(&self, id: ActorId) -> bool {
        self.ids.binary_search(&id).is_ok()
    }

    /// Registered ids in ascending order.
    pub fn actor_ids(&self) -> &[ActorId] {
        &self.ids
    }

    /// Lock an actor for inspection.
    pub fn actor(&self, id: ActorId) -> Option<MutexGuard<'_, Box<dyn Actor>>> {
        let pos = self.ids.binary_search(&id).ok()?;
        Some(self.actors[pos].lock())
    }

    /// Envelopes waiting to be delivered to `id` at the start of the next round.
    pub fn pending_for(&self, id: ActorId) -> usize {
        self.pending.get(&id).map_or(0, VecDeque::len)
    }

    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    fn pending_total(&self) -> u64 {
        self.pending.values().map(|q| q.len() as u64).sum()
    }

    /// Run one iteration of the round loop.
    ///
    /// With no actors registered this is a no-op and the round does not move.
    pub fn step_round(&mut self) -> Result<RoundStats, SimulationError> {
        let started = Instant::now();
        let round = self.round;
        let ctx = RoundContext::new(round, self.actors.len()).with_pending(self.pending_total());
        self.hooks.on_round_start(&ctx);

        // Phase 1: Delivery
        let mut delivered = 0u64;
        for (id, slot) in self.ids.iter().zip(self.actors.iter_mut()) {
            if let Some(queue) = self.pending.remove(id) {
                delivered += queue.len() as u64;
                slot.get_mut().mailbox_mut().deliver_incoming(queue);
            }
        }

        // Phase 2: Step (parallel when enabled)
        let force_sequential = !self.config.parallelization.parallel_step;
        let outputs: Vec<StepOutput> = parallel::map_mutex_slice(
            &self.actors,
            |actor| {
                let result = actor.step();
                (actor.id(), result, actor.mailbox_mut().drain_outbox())
            },
            force_sequential,
        );

        // Phase 3: Collection, ascending sender order
        let mut min_advance: Option<RoundAdvance> = None;
        let mut collected = 0u64;
        let mut dropped = 0u64;
        for (from, result, outbox) in outputs {
            let advance = result.map_err(|source| SimulationError::Step {
                actor: from,
                round,
                source,
            })?;
            min_advance = Some(min_advance.map_or(advance, |m| m.min(advance)));

            for (to, queue) in outbox {
                let count = queue.len() as u64;
                if !self.has_actor(to) {
                    match self.config.undeliverable {
                        UndeliverablePolicy::Fail => {
                            return Err(SimulationError::UndeliverableEnvelope { from, to, round });
                        }
                        UndeliverablePolicy::Drop => {
                            warn!(%from, %to, round, count, "dropping envelopes for unregistered actor");
                            dropped += count;
                            continue;
                        }
                    }
                }
                collected += count;
                self.pending.entry(to).or_default().extend(queue);
            }
        }

        // Phase 4: Advance
        let advance = min_advance.map_or(0, RoundAdvance::get);
        self.round = self.round.saturating_add(advance);

        self.stats.round = self.round;
        self.stats.rounds_executed += 1;
        self.stats.envelopes_delivered += delivered;
        self.stats.envelopes_sent += collected;
        self.stats.envelopes_dropped += dropped;

        let round_stats = RoundStats {
            round,
            advance,
            actors_stepped: self.actors.len(),
            envelopes_delivered: delivered,
            envelopes_collected: collected,
            envelopes_dropped: dropped,
            elapsed: started.elapsed(),
        };

        if self.config.verbose {
            info!(round, advance, delivered, collected, "round complete");
        } else {
            debug!(round, advance, delivered, collected, "round complete");
        }
        self.hooks.on_round_end(&round_stats, &ctx);

        Ok(round_stats)
    }

    /// Run the round loop until the budget is exhausted.
    ///
    /// Any actor error aborts the run; the simulation is left at the failing
    /// round.
    pub fn run(&mut self) -> Result<SimulationStats, SimulationError> {
        info!(
            actors = self.actors.len(),
            max_rounds = self.config.max_rounds,
            parallel = self.config.parallelization.parallel_step,
            "starting simulation"
        );

        if self.actors.is_empty() {
            info!("no actors registered, nothing to run");
        } else {
            while self.round < self.config.max_rounds {
                self.step_round()?;
            }
        }

        self.hooks.on_simulation_end(&self.stats);
        info!(
            rounds = self.stats.rounds_executed,
            round = self.round,
            sent = self.stats.envelopes_sent,
            dropped = self.stats.envelopes_dropped,
            "simulation finished"
        );
        Ok(self.stats.clone())
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("round", &self.round)
            .field("actors", &self.ids)
            .field("stats", &self.stats)
            .field("hooks", &self.hooks)
            .finish()
    }
}
