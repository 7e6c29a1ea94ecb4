//! Payload conventions used by the market protocols.
//!
//! Two envelope shapes travel between the market and its traders:
//!
//! ```text
//! Market → Trader   [price, dividend, signal₁, signal₂, signal₃]
//! Trader → Market   [action]
//! ```
//!
//! Signals and actions are small integer codes carried as `f64`. Decoding is
//! strict: a missing field or an unknown code is an [`EnvelopeError`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Envelope, EnvelopeError};

/// Number of market signals carried in a quote.
pub const SIGNAL_COUNT: usize = 3;

/// Decode a small integer code stored in a float field.
fn decode_code(envelope: &Envelope, index: usize) -> Result<u8, EnvelopeError> {
    let value = envelope.field(index)?;
    if value.fract() == 0.0 && (0.0..=f64::from(u8::MAX)).contains(&value) {
        Ok(value as u8)
    } else {
        Err(EnvelopeError::InvalidCode { index, value })
    }
}

// =============================================================================
// Market Signal
// =============================================================================

/// Direction of a tracked market quantity since the previous round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MarketSignal {
    Increase = 0,
    Decrease = 1,
    #[default]
    NoChange = 2,
}

impl MarketSignal {
    /// Wire code for this signal.
    pub fn code(self) -> f64 {
        f64::from(self as u8)
    }

    /// Parse a wire code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Increase),
            1 => Some(Self::Decrease),
            2 => Some(Self::NoChange),
            _ => None,
        }
    }

    /// Compare a new value against the previous one.
    pub fn compare(current: f64, previous: f64) -> Self {
        if current > previous {
            Self::Increase
        } else if current < previous {
            Self::Decrease
        } else {
            Self::NoChange
        }
    }
}

impl fmt::Display for MarketSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Increase => write!(f, "increase"),
            Self::Decrease => write!(f, "decrease"),
            Self::NoChange => write!(f, "no-change"),
        }
    }
}

// =============================================================================
// Trade Action
// =============================================================================

/// A trader's decision for one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TradeAction {
    Buy = 0,
    Sell = 1,
    #[default]
    NoAction = 2,
}

impl TradeAction {
    /// Wire code for this action.
    pub fn code(self) -> f64 {
        f64::from(self as u8)
    }

    /// Parse a wire code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Buy),
            1 => Some(Self::Sell),
            2 => Some(Self::NoAction),
            _ => None,
        }
    }

    /// Encode as a single-field trader → market envelope.
    pub fn to_envelope(self) -> Envelope {
        Envelope::from([self.code()])
    }
}

impl TryFrom<&Envelope> for TradeAction {
    type Error = EnvelopeError;

    fn try_from(envelope: &Envelope) -> Result<Self, Self::Error> {
        let code = decode_code(envelope, 0)?;
        Self::from_code(code).ok_or(EnvelopeError::InvalidCode {
            index: 0,
            value: f64::from(code),
        })
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
            Self::NoAction => write!(f, "no-action"),
        }
    }
}

// =============================================================================
// Market Quote
// =============================================================================

/// The market's per-round broadcast to traders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketQuote {
    /// Stock price after this round's adjustment.
    pub price: f64,
    /// Dividend paid per share.
    pub dividend: f64,
    /// Dividend direction, 10-round average direction, 50-round average direction.
    pub signals: [MarketSignal; SIGNAL_COUNT],
}

impl MarketQuote {
    /// Create a new quote.
    pub fn new(price: f64, dividend: f64, signals: [MarketSignal; SIGNAL_COUNT]) -> Self {
        Self {
            price,
            dividend,
            signals,
        }
    }

    /// Encode as `[price, dividend, s1, s2, s3]`.
    pub fn to_envelope(&self) -> Envelope {
        let mut fields = Vec::with_capacity(2 + SIGNAL_COUNT);
        fields.push(self.price);
        fields.push(self.dividend);
        fields.extend(self.signals.iter().map(|s| s.code()));
        Envelope::new(fields)
    }
}

impl TryFrom<&Envelope> for MarketQuote {
    type Error = EnvelopeError;

    fn try_from(envelope: &Envelope) -> Result<Self, Self::Error> {
        let price = envelope.field(0)?;
        let dividend = envelope.field(1)?;
        let mut signals = [MarketSignal::NoChange; SIGNAL_COUNT];
        for (offset, slot) in signals.iter_mut().enumerate() {
            let index = 2 + offset;
            let code = decode_code(envelope, index)?;
            *slot = MarketSignal::from_code(code).ok_or(EnvelopeError::InvalidCode {
                index,
                value: f64::from(code),
            })?;
        }
        Ok(Self::new(price, dividend, signals))
    }
}
