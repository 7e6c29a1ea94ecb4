//! Integration tests for the round loop's delivery, ordering and advance rules.
//!
//! Every test actor logs what it receives into a shared journal so the tests
//! can inspect exactly which envelope arrived in which round.

use std::sync::Arc;

use agents::{Actor, ActorError, Mailbox};
use parking_lot::Mutex;
use simulation::{
    ParallelizationConfig, Simulation, SimulationConfig, SimulationError, UndeliverablePolicy,
};
use types::{ActorId, Envelope, Round, RoundAdvance};

/// `(round, envelope)` pairs in arrival order.
type Journal = Arc<Mutex<Vec<(Round, Envelope)>>>;

/// Sends a scripted list of `(round, destination, envelope)` and journals
/// everything it receives. Assumes it always advances by one round.
struct Scripted {
    mailbox: Mailbox,
    script: Vec<(Round, ActorId, Envelope)>,
    round: Round,
    advance: RoundAdvance,
    journal: Journal,
}

impl Scripted {
    fn new(id: u64) -> Self {
        Self {
            mailbox: Mailbox::new(ActorId(id)),
            script: Vec::new(),
            round: 0,
            advance: RoundAdvance::ONE,
            journal: Journal::default(),
        }
    }

    fn sends(mut self, round: Round, to: u64, fields: &[f64]) -> Self {
        self.script.push((round, ActorId(to), Envelope::from(fields)));
        self
    }

    fn advancing(mut self, rounds: u64) -> Self {
        self.advance = RoundAdvance::new(rounds).unwrap();
        self
    }

    fn journal(&self) -> Journal {
        Arc::clone(&self.journal)
    }

    fn boxed(self) -> Box<dyn Actor> {
        Box::new(self)
    }
}

impl Actor for Scripted {
    fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }

    fn mailbox_mut(&mut self) -> &mut Mailbox {
        &mut self.mailbox
    }

    fn step(&mut self) -> Result<RoundAdvance, ActorError> {
        while let Some(envelope) = self.mailbox.receive() {
            self.journal.lock().push((self.round, envelope));
        }
        for (round, to, envelope) in &self.script {
            if *round == self.round {
                self.mailbox.send(*to, envelope.clone());
            }
        }
        self.round += 1;
        Ok(self.advance)
    }
}

/// Fails on its `fail_at`-th step.
struct Faulty {
    mailbox: Mailbox,
    steps: u64,
    fail_at: u64,
}

impl Actor for Faulty {
    fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }

    fn mailbox_mut(&mut self) -> &mut Mailbox {
        &mut self.mailbox
    }

    fn step(&mut self) -> Result<RoundAdvance, ActorError> {
        if self.steps == self.fail_at {
            return Err(ActorError::protocol(self.mailbox.id(), "scripted failure"));
        }
        self.steps += 1;
        Ok(RoundAdvance::ONE)
    }
}

/// Each step forwards the sum of everything received, plus its own id, to
/// the next two actors in the ring.
struct Gossip {
    mailbox: Mailbox,
    ring: u64,
    round: Round,
    journal: Journal,
}

impl Actor for Gossip {
    fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }

    fn mailbox_mut(&mut self) -> &mut Mailbox {
        &mut self.mailbox
    }

    fn step(&mut self) -> Result<RoundAdvance, ActorError> {
        let id = self.mailbox.id().0;
        let mut sum = id as f64;
        while let Some(envelope) = self.mailbox.receive() {
            sum += envelope.fields().iter().sum::<f64>();
            self.journal.lock().push((self.round, envelope));
        }
        self.mailbox
            .send(ActorId((id + 1) % self.ring), Envelope::from([sum, id as f64]));
        self.mailbox
            .send(ActorId((id + 2) % self.ring), Envelope::from([id as f64]));
        self.round += 1;
        Ok(RoundAdvance::ONE)
    }
}

fn sequential(rounds: Round) -> SimulationConfig {
    SimulationConfig::new(rounds).sequential()
}

#[test]
fn test_four_envelopes_arrive_exactly_once_next_round() {
    let payload = [1.0, 2.0, 3.0, 4.0];
    let sender = Scripted::new(1)
        .sends(0, 2, &payload)
        .sends(0, 2, &payload)
        .sends(0, 2, &payload)
        .sends(0, 2, &payload);
    let receiver = Scripted::new(2);
    let journal = receiver.journal();

    let mut sim =
        Simulation::with_actors(sequential(5), vec![sender.boxed(), receiver.boxed()]).unwrap();
    let stats = sim.run().unwrap();

    let received = journal.lock().clone();
    assert_eq!(received.len(), 4);
    assert!(received.iter().all(|(round, _)| *round == 1));
    assert!(
        received
            .iter()
            .all(|(_, e)| e.fields() == payload.as_slice())
    );
    assert_eq!(stats.rounds_executed, 5);
    assert_eq!(stats.envelopes_sent, 4);
    assert_eq!(stats.envelopes_delivered, 4);
}

#[test]
fn test_nothing_visible_in_the_sending_round() {
    let sender = Scripted::new(1).sends(0, 2, &[7.0]);
    let receiver = Scripted::new(2);
    let journal = receiver.journal();
    let mut sim =
        Simulation::with_actors(sequential(5), vec![sender.boxed(), receiver.boxed()]).unwrap();

    sim.step_round().unwrap();
    assert!(journal.lock().is_empty());
    assert_eq!(sim.pending_for(ActorId(2)), 1);

    sim.step_round().unwrap();
    assert_eq!(journal.lock().len(), 1);
    assert_eq!(sim.pending_for(ActorId(2)), 0);
}

#[test]
fn test_higher_id_sender_still_next_round() {
    // Receiver steps before the sender; the envelope must still wait a round.
    let sender = Scripted::new(9).sends(0, 2, &[1.0]);
    let receiver = Scripted::new(2);
    let journal = receiver.journal();
    let mut sim =
        Simulation::with_actors(sequential(3), vec![receiver.boxed(), sender.boxed()]).unwrap();
    sim.run().unwrap();
    assert_eq!(journal.lock().as_slice(), &[(1, Envelope::from([1.0]))]);
}

#[test]
fn test_same_sender_keeps_send_order() {
    let sender = Scripted::new(1)
        .sends(0, 2, &[1.0])
        .sends(0, 2, &[2.0])
        .sends(0, 2, &[3.0]);
    let receiver = Scripted::new(2);
    let journal = receiver.journal();
    let mut sim =
        Simulation::with_actors(sequential(2), vec![sender.boxed(), receiver.boxed()]).unwrap();
    sim.run().unwrap();

    let order: Vec<f64> = journal.lock().iter().map(|(_, e)| e.fields()[0]).collect();
    assert_eq!(order, vec![1.0, 2.0, 3.0]);
}

#[test]
fn test_cross_sender_order_is_ascending_id() {
    for parallel_step in [false, true] {
        let receiver = Scripted::new(5);
        let journal = receiver.journal();
        // Registered out of order on purpose.
        let actors = vec![
            Scripted::new(8).sends(0, 5, &[8.0]).boxed(),
            receiver.boxed(),
            Scripted::new(3)
                .sends(0, 5, &[3.0])
                .sends(0, 5, &[3.5])
                .boxed(),
            Scripted::new(1).sends(0, 5, &[1.0]).boxed(),
        ];
        let config =
            SimulationConfig::new(2).with_parallelization(ParallelizationConfig { parallel_step });
        let mut sim = Simulation::with_actors(config, actors).unwrap();
        sim.run().unwrap();

        let order: Vec<f64> = journal.lock().iter().map(|(_, e)| e.fields()[0]).collect();
        assert_eq!(order, vec![1.0, 3.0, 3.5, 8.0]);
    }
}

#[test]
fn test_parallel_and_sequential_runs_match() {
    const RING: u64 = 16;

    let run = |config: SimulationConfig| {
        let journals: Vec<Journal> = (0..RING).map(|_| Journal::default()).collect();
        let actors = (0..RING).map(|id| {
            Box::new(Gossip {
                mailbox: Mailbox::new(ActorId(id)),
                ring: RING,
                round: 0,
                journal: Arc::clone(&journals[id as usize]),
            }) as Box<dyn Actor>
        });
        let mut sim = Simulation::with_actors(config, actors).unwrap();
        let stats = sim.run().unwrap();
        let logs: Vec<Vec<(Round, Envelope)>> = journals.iter().map(|j| j.lock().clone()).collect();
        (stats, logs)
    };

    let (seq_stats, seq_logs) = run(SimulationConfig::new(20).sequential());
    let (par_stats, par_logs) = run(SimulationConfig::new(20));

    assert_eq!(seq_stats, par_stats);
    assert_eq!(seq_logs, par_logs);
    assert_eq!(seq_stats.envelopes_sent, 2 * RING * 20);
}

#[test]
fn test_round_advances_by_minimum() {
    let mut sim = Simulation::with_actors(
        sequential(10),
        vec![
            Scripted::new(1).advancing(2).boxed(),
            Scripted::new(2).boxed(),
        ],
    )
    .unwrap();
    let first = sim.step_round().unwrap();
    assert_eq!(first.advance, 1);
    assert_eq!(sim.current_round(), 1);

    let mut slow = Simulation::with_actors(
        sequential(10),
        vec![
            Scripted::new(1).advancing(2).boxed(),
            Scripted::new(2).advancing(3).boxed(),
        ],
    )
    .unwrap();
    let stats = slow.run().unwrap();
    assert_eq!(stats.rounds_executed, 5);
    assert_eq!(stats.round, 10);
}

#[test]
fn test_overshoot_stops_past_budget() {
    let mut sim =
        Simulation::with_actors(sequential(5), vec![Scripted::new(1).advancing(2).boxed()])
            .unwrap();
    let stats = sim.run().unwrap();
    assert_eq!(stats.rounds_executed, 3);
    assert_eq!(sim.current_round(), 6);
}

#[test]
fn test_quiet_population_cycles_exactly_n_rounds() {
    let actors: Vec<Scripted> = (1..=3).map(Scripted::new).collect();
    let journals: Vec<Journal> = actors.iter().map(Scripted::journal).collect();
    let mut sim =
        Simulation::with_actors(SimulationConfig::new(25), actors.into_iter().map(Scripted::boxed))
            .unwrap();

    let stats = sim.run().unwrap();

    assert_eq!(stats.rounds_executed, 25);
    assert_eq!(stats.envelopes_sent, 0);
    assert!(journals.iter().all(|j| j.lock().is_empty()));
    for id in 1..=3 {
        assert_eq!(
            sim.actor(ActorId(id)).unwrap().mailbox().pending_inbound(),
            0
        );
    }
}

#[test]
fn test_empty_population_is_noop() {
    let mut sim = Simulation::new(SimulationConfig::new(100));
    let stats = sim.run().unwrap();
    assert_eq!(stats.rounds_executed, 0);
    assert_eq!(sim.current_round(), 0);
}

#[test]
fn test_undeliverable_dropped_and_counted() {
    let sender = Scripted::new(1).sends(0, 99, &[1.0]).sends(0, 99, &[2.0]);
    let mut sim = Simulation::with_actors(sequential(3), vec![sender.boxed()]).unwrap();
    let stats = sim.run().unwrap();
    assert_eq!(stats.envelopes_dropped, 2);
    assert_eq!(stats.envelopes_sent, 0);
    assert_eq!(sim.pending_for(ActorId(99)), 0);
}

#[test]
fn test_undeliverable_fails_under_fail_policy() {
    let sender = Scripted::new(1).sends(1, 99, &[1.0]);
    let config = sequential(5).with_undeliverable_policy(UndeliverablePolicy::Fail);
    let mut sim = Simulation::with_actors(config, vec![sender.boxed()]).unwrap();
    let err = sim.run().unwrap_err();
    assert_eq!(
        err,
        SimulationError::UndeliverableEnvelope {
            from: ActorId(1),
            to: ActorId(99),
            round: 1,
        }
    );
}

#[test]
fn test_step_error_aborts_run() {
    let faulty = Box::new(Faulty {
        mailbox: Mailbox::new(ActorId(4)),
        steps: 0,
        fail_at: 2,
    });
    let mut sim =
        Simulation::with_actors(SimulationConfig::new(10), vec![Scripted::new(1).boxed(), faulty])
            .unwrap();

    let err = sim.run().unwrap_err();

    assert_eq!(
        err,
        SimulationError::Step {
            actor: ActorId(4),
            round: 2,
            source: ActorError::protocol(ActorId(4), "scripted failure"),
        }
    );
    assert_eq!(sim.current_round(), 2);
    assert!(err.to_string().contains("round 2"));
}
