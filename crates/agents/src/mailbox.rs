//! Per-actor message queues.
//!
//! Every actor embeds one [`Mailbox`]: an inbound FIFO filled by the engine at
//! the start of a round, and an outbound FIFO per destination filled by the
//! actor during its step and drained by the engine afterwards.
//!
//! ## Round Visibility
//!
//! ```text
//! round R   : actor.send(B, e)        → outbox[B] = [.., e]
//! end of R  : engine.drain_outbox()   → pending[B] = [.., e]
//! round R+1 : engine.deliver(pending) → B.inbox = [.., e]
//!             B.receive()             → Some(e)
//! ```

use std::collections::{BTreeMap, VecDeque};

use types::{ActorId, Envelope};

/// Outbound queues keyed by destination, iterated in ascending destination order.
pub type Outbox = BTreeMap<ActorId, VecDeque<Envelope>>;

/// Identity plus inbound/outbound queues of a single actor.
#[derive(Debug, Clone, Default)]
pub struct Mailbox {
    id: ActorId,
    inbox: VecDeque<Envelope>,
    outbox: Outbox,
}

impl Mailbox {
    /// Create an empty mailbox for the actor `id`.
    pub fn new(id: ActorId) -> Self {
        Self {
            id,
            inbox: VecDeque::new(),
            outbox: Outbox::new(),
        }
    }

    /// Identity of the owning actor.
    pub fn id(&self) -> ActorId {
        self.id
    }

    /// Queue `envelope` for `destination`. Never fails and never blocks.
    ///
    /// Unknown destinations are accepted here; the engine decides what happens
    /// to them at collection time.
    pub fn send(&mut self, destination: ActorId, envelope: Envelope) {
        self.outbox.entry(destination).or_default().push_back(envelope);
    }

    /// Pop the oldest delivered envelope, or `None` when the inbox is empty.
    pub fn receive(&mut self) -> Option<Envelope> {
        self.inbox.pop_front()
    }

    /// Append a batch to the inbox tail, keeping the batch order.
    ///
    /// Engine-side: called once per round during the delivery phase.
    pub fn deliver_incoming(&mut self, envelopes: impl IntoIterator<Item = Envelope>) {
        self.inbox.extend(envelopes);
    }

    /// Take the whole outbox, leaving it empty for the next round.
    ///
    /// Engine-side: called once per round during the collection phase.
    pub fn drain_outbox(&mut self) -> Outbox {
        std::mem::take(&mut self.outbox)
    }

    /// Number of envelopes waiting to be received.
    pub fn pending_inbound(&self) -> usize {
        self.inbox.len()
    }

    /// Number of envelopes queued for sending this round.
    pub fn pending_outbound(&self) -> usize {
        self.outbox.values().map(VecDeque::len).sum()
    }
}
