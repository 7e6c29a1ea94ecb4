use agents::ActorError;
use thiserror::Error;
use types::{ActorId, Round};

/// Errors that abort a simulation run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("actor {0} is already registered")]
    DuplicateActor(ActorId),

    #[error("{actor} failed in round {round}: {source}")]
    Step {
        actor: ActorId,
        round: Round,
        #[source]
        source: ActorError,
    },

    #[error("{from} sent an envelope to unregistered {to} in round {round}")]
    UndeliverableEnvelope {
        from: ActorId,
        to: ActorId,
        round: Round,
    },
}
