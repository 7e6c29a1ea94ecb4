//! Core types for the Round Gym simulation.
//!
//! This crate provides the data shared by every other crate: actor
//! identifiers, the round clock, the [`Envelope`] message format and the
//! payload conventions the market protocols put inside envelopes.

mod envelope;
mod ids;
pub mod protocol;

pub use envelope::Envelope;
pub use ids::{ActorId, Round, RoundAdvance};
pub use protocol::{MarketQuote, MarketSignal, SIGNAL_COUNT, TradeAction};

use thiserror::Error;

/// Errors raised when a consumer reads an envelope against the wrong convention.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnvelopeError {
    /// The sender's convention does not provide a field at this index.
    #[error("envelope has {len} fields, field {index} requested")]
    MissingField { index: usize, len: usize },

    /// The field holds a value that is not a valid code for its position.
    #[error("field {index} holds invalid code {value}")]
    InvalidCode { index: usize, value: f64 },
}
