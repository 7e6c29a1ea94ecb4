//! Decision state shared by both trader protocols.
//!
//! [`TraderCore`] is the trader's private brain: wealth, rule book, random
//! source and the action decided from the latest quote. The protocol actors
//! only differ in how quotes reach `inform` and how the resulting action
//! reaches the market.

use market::Wealth;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use types::{MarketQuote, TradeAction};

use crate::rules::{self, RuleBook, RuleInput, TradingRule};

/// Configuration for a trader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraderConfig {
    /// Wealth at construction, split evenly into cash and deposit.
    pub initial_wealth: f64,
    /// Interest rate applied to the bank deposit once per quote.
    pub interest_rate: f64,
}

impl Default for TraderConfig {
    fn default() -> Self {
        Self {
            initial_wealth: 1000.0,
            interest_rate: 0.001,
        }
    }
}

/// A trader's wealth, learning state and pending decision.
#[derive(Debug, Clone)]
pub struct TraderCore {
    wealth: Wealth,
    rules: RuleBook,
    /// Mark-to-market wealth after the previous quote.
    last_estimate: f64,
    action: TradeAction,
    quotes_seen: u64,
    rng: StdRng,
}

impl TraderCore {
    /// Create a trader core with an OS-seeded random source.
    pub fn new(config: &TraderConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Create a trader core with a specific seed (for reproducible runs).
    pub fn with_seed(config: &TraderConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &TraderConfig, rng: StdRng) -> Self {
        Self {
            wealth: Wealth::new(config.initial_wealth, config.interest_rate),
            rules: RuleBook::new(),
            last_estimate: config.initial_wealth,
            action: TradeAction::NoAction,
            quotes_seen: 0,
            rng,
        }
    }

    /// Action decided from the latest quote (`NoAction` before any quote).
    pub fn action(&self) -> TradeAction {
        self.action
    }

    pub fn wealth(&self) -> &Wealth {
        &self.wealth
    }

    pub fn rules(&self) -> &RuleBook {
        &self.rules
    }

    pub fn current_rule(&self) -> TradingRule {
        self.rules.current()
    }

    /// Number of quotes processed so far.
    pub fn quotes_seen(&self) -> u64 {
        self.quotes_seen
    }

    /// React to a market quote and execute the resulting trade.
    ///
    /// 1. Collect dividends and interest.
    /// 2. Reinforce the current rule if wealth rose since the last quote.
    /// 3. Choose the next rule (explore or exploit).
    /// 4. Evaluate it and apply the trade at the quoted price.
    pub fn inform(&mut self, quote: &MarketQuote) -> TradeAction {
        self.wealth.add_dividends(quote.dividend);
        self.wealth.accrue_interest();

        let estimate = self.wealth.estimate(quote.price);
        if estimate > self.last_estimate {
            self.rules.reinforce();
        }
        self.last_estimate = estimate;

        let rule = self.rules.choose_next(&mut self.rng);
        let input = RuleInput {
            price: quote.price,
            signals: quote.signals,
            cash: self.wealth.cash(),
            shares: self.wealth.shares(),
        };
        self.action = rules::evaluate(rule, &input, &mut self.rng);

        match self.action {
            TradeAction::Buy => self.wealth.buy(quote.price),
            TradeAction::Sell => self.wealth.sell(quote.price),
            TradeAction::NoAction => {}
        }
        self.quotes_seen += 1;
        self.action
    }
}
