//! Actor trait and error type for the round engine.
//!
//! This module defines the `Actor` trait every simulated participant
//! implements. The engine only ever talks to actors through it.
//!
//! # Mailbox Access
//!
//! Actors embed a [`Mailbox`] and expose it through `mailbox()` /
//! `mailbox_mut()`. The provided methods (`id`, `send`, `receive`) delegate to
//! it, so an implementation only writes the accessors and `step`.

use thiserror::Error;
use types::{ActorId, Envelope, EnvelopeError, RoundAdvance};

use crate::mailbox::Mailbox;

/// Errors an actor can raise from `step`. Any of them aborts the run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActorError {
    /// An envelope did not follow the payload convention the actor expects.
    #[error("{actor} received a malformed envelope: {source}")]
    Envelope {
        actor: ActorId,
        #[source]
        source: EnvelopeError,
    },

    /// The actor's own protocol invariants were violated.
    #[error("{actor} protocol violation: {message}")]
    Protocol { actor: ActorId, message: String },
}

impl ActorError {
    /// Attribute an envelope decoding failure to `actor`.
    pub fn envelope(actor: ActorId, source: EnvelopeError) -> Self {
        Self::Envelope { actor, source }
    }

    /// Build a protocol violation for `actor`.
    pub fn protocol(actor: ActorId, message: impl Into<String>) -> Self {
        Self::Protocol {
            actor,
            message: message.into(),
        }
    }
}

/// The core trait that all simulated actors must implement.
///
/// The engine calls `step` exactly once per round, after delivering the
/// envelopes sent to this actor during the previous round. Inside `step` the
/// actor may `receive` (typically until `None`) and `send` any number of
/// times; nothing it sends becomes visible before the next round.
///
/// # Example
/// ```ignore
/// struct Echo {
///     mailbox: Mailbox,
///     peer: ActorId,
/// }
///
/// impl Actor for Echo {
///     fn mailbox(&self) -> &Mailbox { &self.mailbox }
///     fn mailbox_mut(&mut self) -> &mut Mailbox { &mut self.mailbox }
///
///     fn step(&mut self) -> Result<RoundAdvance, ActorError> {
///         while let Some(envelope) = self.receive() {
///             self.send(self.peer, envelope);
///         }
///         Ok(RoundAdvance::ONE)
///     }
/// }
/// ```
pub trait Actor: Send {
    /// The actor's embedded mailbox.
    fn mailbox(&self) -> &Mailbox;

    /// Mutable access to the embedded mailbox.
    fn mailbox_mut(&mut self) -> &mut Mailbox;

    /// Perform this round's unit of work.
    ///
    /// Returns how many rounds this actor proposes to advance the clock by;
    /// the engine advances by the minimum across the population.
    fn step(&mut self) -> Result<RoundAdvance, ActorError>;

    /// Unique identity, also the routing key for envelopes.
    fn id(&self) -> ActorId {
        self.mailbox().id()
    }

    /// Human-readable name (for logging/debugging).
    fn name(&self) -> &str {
        "Actor"
    }

    /// Queue an envelope for `destination`; delivered next round.
    fn send(&mut self, destination: ActorId, envelope: Envelope) {
        self.mailbox_mut().send(destination, envelope);
    }

    /// Take the oldest delivered envelope, if any.
    fn receive(&mut self) -> Option<Envelope> {
        self.mailbox_mut().receive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo {
        mailbox: Mailbox,
        peer: ActorId,
    }

    impl Actor for Echo {
        fn mailbox(&self) -> &Mailbox {
            &self.mailbox
        }

        fn mailbox_mut(&mut self) -> &mut Mailbox {
            &mut self.mailbox
        }

        fn step(&mut self) -> Result<RoundAdvance, ActorError> {
            while let Some(envelope) = self.receive() {
                self.send(self.peer, envelope);
            }
            Ok(RoundAdvance::ONE)
        }
    }

    #[test]
    fn test_provided_methods_delegate_to_mailbox() {
        let mut echo = Echo {
            mailbox: Mailbox::new(ActorId(3)),
            peer: ActorId(9),
        };
        assert_eq!(echo.id(), ActorId(3));
        assert_eq!(echo.name(), "Actor");

        echo.mailbox_mut()
            .deliver_incoming([Envelope::from([1.0]), Envelope::from([2.0])]);
        assert_eq!(echo.step(), Ok(RoundAdvance::ONE));

        let outbox = echo.mailbox_mut().drain_outbox();
        assert_eq!(outbox[&ActorId(9)].len(), 2);
    }

    #[test]
    fn test_error_messages_name_the_actor() {
        let err = ActorError::envelope(
            ActorId(4),
            EnvelopeError::MissingField { index: 2, len: 1 },
        );
        assert_eq!(
            err.to_string(),
            "Actor#4 received a malformed envelope: envelope has 1 fields, field 2 requested"
        );
        let err = ActorError::protocol(ActorId(0), "no traders");
        assert_eq!(err.to_string(), "Actor#0 protocol violation: no traders");
    }
}
