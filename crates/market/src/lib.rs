//! Market models used by the trading protocols.
//!
//! - [`Stock`]: price adjustment from order flow, dividend draws and the three
//!   market signals broadcast to traders.
//! - [`Wealth`]: per-trader cash, shares and bank deposit.
//!
//! Neither type knows about actors or rounds; the protocol actors in the
//! `agents` crate own them and drive them once per step.

mod stock;
mod wealth;

pub use stock::{Stock, StockConfig};
pub use wealth::Wealth;
