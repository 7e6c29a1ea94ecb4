//! Identifier and clock types for the round engine.
//!
//! Actors are addressed by [`ActorId`]; the global clock counts [`Round`]s and
//! moves forward by a [`RoundAdvance`] each iteration of the engine loop.

use derive_more::{Add, From, Into};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU64;

// =============================================================================
// Actor Identity
// =============================================================================

/// Unique identifier for an actor. Also the routing key for envelopes.
///
/// Ordering matters: the engine visits actors in ascending `ActorId` order,
/// which fixes the cross-sender delivery order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    Add,
    From,
    Into,
)]
pub struct ActorId(pub u64);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Actor#{}", self.0)
    }
}

// =============================================================================
// Time Types
// =============================================================================

/// Simulation round (discrete time step).
pub type Round = u64;

/// Number of rounds an actor proposes to move the global clock by.
///
/// Always positive; a zero advance would stall the engine, so it cannot be
/// constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoundAdvance(NonZeroU64);

impl RoundAdvance {
    /// Advance by a single round. Every shipped agent uses this.
    pub const ONE: Self = Self(NonZeroU64::MIN);

    /// Create an advance of `rounds`, or `None` for zero.
    pub fn new(rounds: u64) -> Option<Self> {
        NonZeroU64::new(rounds).map(Self)
    }

    /// Number of rounds as a plain integer.
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl Default for RoundAdvance {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for RoundAdvance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_id_ordering() {
        let mut ids = vec![ActorId(7), ActorId(0), ActorId(3)];
        ids.sort();
        assert_eq!(ids, vec![ActorId(0), ActorId(3), ActorId(7)]);
        assert_eq!(ActorId(1) + ActorId(2), ActorId(3));
        assert_eq!(ActorId(5).to_string(), "Actor#5");
    }

    #[test]
    fn test_round_advance_rejects_zero() {
        assert!(RoundAdvance::new(0).is_none());
        assert_eq!(RoundAdvance::new(4).map(RoundAdvance::get), Some(4));
        assert_eq!(RoundAdvance::ONE.get(), 1);
        assert_eq!(RoundAdvance::default(), RoundAdvance::ONE);
    }
}
