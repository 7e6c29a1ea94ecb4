//! Agents crate: actors for the Round Gym simulation.
//!
//! This crate provides:
//! - The `Actor` trait that every simulated participant implements
//! - `Mailbox`, the per-actor inbound/outbound envelope queues
//! - Trading rules and the `TraderCore` decision state
//! - The two market protocols (`protocols` module)
//!
//! # Architecture
//! Each round the engine delivers last round's envelopes into every mailbox,
//! calls `step` once per actor, then drains every outbox. Actors never see the
//! engine; they only `receive`, `send` and return a round advance.
//!
//! # Available Protocols
//! - [`protocols::MessageMarket`] / [`protocols::MessageTrader`] - envelope based
//! - [`protocols::DirectMarket`] / [`protocols::DirectTrader`] - shared-state calls
//!
//! # Example
//! ```ignore
//! use agents::{Actor, ActorError, Mailbox};
//! use types::{ActorId, RoundAdvance};
//!
//! struct Idle {
//!     mailbox: Mailbox,
//! }
//!
//! impl Actor for Idle {
//!     fn mailbox(&self) -> &Mailbox { &self.mailbox }
//!     fn mailbox_mut(&mut self) -> &mut Mailbox { &mut self.mailbox }
//!     fn step(&mut self) -> Result<RoundAdvance, ActorError> { Ok(RoundAdvance::ONE) }
//! }
//! ```

mod mailbox;
pub mod protocols;
pub mod rules;
mod trader;
mod traits;

pub use mailbox::{Mailbox, Outbox};
pub use protocols::{DirectMarket, DirectTrader, MessageMarket, MessageTrader, OrderTally};
pub use rules::{RuleBook, TradingRule};
pub use trader::{TraderConfig, TraderCore};
pub use traits::{Actor, ActorError};
