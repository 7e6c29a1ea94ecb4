//! Trading rules and per-trader rule learning.
//!
//! A trader holds five fixed rules and a [`RuleBook`] recording how often each
//! rule coincided with a rise in wealth. Each round it either explores (picks
//! a random rule with probability 2/5) or exploits (switches to the strongest
//! rule), then evaluates the chosen rule against the latest quote.
//!
//! | rule | buys when                          | sells when                          |
//! |------|------------------------------------|-------------------------------------|
//! | 1    | dividend rising                    | dividend flat                       |
//! | 2    | long average falling               | short average rising                |
//! | 3    | short average rising               | short average rising, cannot buy    |
//! | 4    | coin flip (2/5)                    | coin flip (3/5)                     |
//! | 5    | long average falling               | long average rising                 |
//!
//! Buying always requires `price < cash`; selling requires at least one share.

use rand::Rng;
use serde::{Deserialize, Serialize};
use types::{MarketSignal, TradeAction};

/// Draws are uniform over `1..=DRAW_MAX`; a draw below `EXPLORE_BELOW` means explore/buy.
const DRAW_MAX: u8 = 5;
const EXPLORE_BELOW: u8 = 3;

/// One of the five fixed trading rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TradingRule {
    #[default]
    DividendMomentum,
    AverageReversal,
    ShortTrend,
    Random,
    LongTrendContrarian,
}

impl TradingRule {
    /// All rules in evaluation order.
    pub const ALL: [TradingRule; 5] = [
        TradingRule::DividendMomentum,
        TradingRule::AverageReversal,
        TradingRule::ShortTrend,
        TradingRule::Random,
        TradingRule::LongTrendContrarian,
    ];

    /// Position of this rule in [`TradingRule::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Rule for a draw in `1..=5`.
    fn from_draw(draw: u8) -> Self {
        Self::ALL[usize::from(draw.clamp(1, DRAW_MAX) - 1)]
    }
}

/// What a rule sees when deciding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleInput {
    pub price: f64,
    pub signals: [MarketSignal; 3],
    pub cash: f64,
    pub shares: i64,
}

impl RuleInput {
    fn can_buy(&self) -> bool {
        self.price < self.cash
    }

    fn can_sell(&self) -> bool {
        self.shares >= 1
    }
}

/// Evaluate `rule` against the latest market view.
///
/// Only the random rule consumes randomness.
pub fn evaluate(rule: TradingRule, input: &RuleInput, rng: &mut impl Rng) -> TradeAction {
    use types::MarketSignal::{Decrease, Increase, NoChange};

    let [dividend, short_avg, long_avg] = input.signals;
    match rule {
        TradingRule::DividendMomentum => {
            if dividend == Increase && input.can_buy() {
                TradeAction::Buy
            } else if dividend == NoChange && input.can_sell() {
                TradeAction::Sell
            } else {
                TradeAction::NoAction
            }
        }
        TradingRule::AverageReversal => {
            if short_avg == Increase && input.can_sell() {
                TradeAction::Sell
            } else if input.can_buy() && long_avg == Decrease {
                TradeAction::Buy
            } else {
                TradeAction::NoAction
            }
        }
        TradingRule::ShortTrend => {
            if short_avg == Increase && input.can_buy() {
                TradeAction::Buy
            } else if short_avg == Increase && input.can_sell() {
                TradeAction::Sell
            } else {
                TradeAction::NoAction
            }
        }
        TradingRule::Random => {
            if rng.random_range(1..=DRAW_MAX) < EXPLORE_BELOW {
                if input.can_buy() {
                    TradeAction::Buy
                } else {
                    TradeAction::NoAction
                }
            } else if input.can_sell() {
                TradeAction::Sell
            } else {
                TradeAction::NoAction
            }
        }
        TradingRule::LongTrendContrarian => {
            if long_avg == Increase && input.can_sell() {
                TradeAction::Sell
            } else if long_avg == Decrease && input.can_buy() {
                TradeAction::Buy
            } else {
                TradeAction::NoAction
            }
        }
    }
}

/// Per-trader rule strengths and the rule currently in use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleBook {
    strengths: [u32; 5],
    current: TradingRule,
}

impl RuleBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rule currently in use.
    pub fn current(&self) -> TradingRule {
        self.current
    }

    /// Strength accumulated by `rule`.
    pub fn strength(&self, rule: TradingRule) -> u32 {
        self.strengths[rule.index()]
    }

    /// Credit the current rule with a wealth increase.
    pub fn reinforce(&mut self) {
        self.strengths[self.current.index()] += 1;
    }

    /// Pick the rule for the coming decision.
    ///
    /// With probability 2/5 a uniformly random rule; otherwise the strongest
    /// rule, keeping the current one on ties.
    pub fn choose_next(&mut self, rng: &mut impl Rng) -> TradingRule {
        if rng.random_range(1..=DRAW_MAX) < EXPLORE_BELOW {
            self.current = TradingRule::from_draw(rng.random_range(1..=DRAW_MAX));
        } else {
            for rule in TradingRule::ALL {
                if self.strength(rule) > self.strength(self.current) {
                    self.current = rule;
                }
            }
        }
        self.current
    }
}
