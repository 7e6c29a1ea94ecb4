//! Market protocols built on the actor contract.
//!
//! Both protocols run the same economics (one [`market::Stock`], many
//! [`crate::TraderCore`]s); they differ only in how quotes and actions travel:
//!
//! - [`message`]: envelopes through the engine, one round of latency each way.
//! - [`direct`]: shared state, the market calls traders directly.
//!
//! The engine cannot tell them apart; every actor here returns an advance of
//! one round.

pub mod direct;
pub mod message;

pub use direct::{DirectMarket, DirectTrader, OrderTally, SharedTrader};
pub use message::{MessageMarket, MessageTrader};
