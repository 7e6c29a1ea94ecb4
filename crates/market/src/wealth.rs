//! Per-trader wealth accounting.
//!
//! A trader's starting wealth is split evenly between a bank deposit (which
//! earns interest) and cash (which funds stock purchases). Trades move one
//! share at a time at the quoted price.

use serde::{Deserialize, Serialize};

/// Cash, shares and savings of a single trader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wealth {
    cash: f64,
    shares: i64,
    bank_deposit: f64,
    interest_rate: f64,
}

impl Wealth {
    /// Split `initial` evenly between deposit and cash.
    pub fn new(initial: f64, interest_rate: f64) -> Self {
        let bank_deposit = 0.5 * initial;
        Self {
            cash: initial - bank_deposit,
            shares: 0,
            bank_deposit,
            interest_rate,
        }
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn shares(&self) -> i64 {
        self.shares
    }

    pub fn bank_deposit(&self) -> f64 {
        self.bank_deposit
    }

    /// Buy one share.
    pub fn buy(&mut self, price: f64) {
        self.shares += 1;
        self.cash -= price;
    }

    /// Sell one share.
    pub fn sell(&mut self, price: f64) {
        self.shares -= 1;
        self.cash += price;
    }

    /// Mark-to-market value of everything the trader owns.
    pub fn estimate(&self, price: f64) -> f64 {
        price * self.shares as f64 + self.bank_deposit + self.cash
    }

    /// Compound the bank deposit by one period.
    pub fn accrue_interest(&mut self) {
        self.bank_deposit *= 1.0 + self.interest_rate;
    }

    /// Credit dividends for the shares currently held.
    pub fn add_dividends(&mut self, per_share: f64) {
        self.cash += self.shares as f64 * per_share;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_split() {
        let w = Wealth::new(1000.0, 0.001);
        assert_eq!(w.cash(), 500.0);
        assert_eq!(w.bank_deposit(), 500.0);
        assert_eq!(w.shares(), 0);
        assert_eq!(w.estimate(100.0), 1000.0);
    }

    #[test]
    fn test_buy_then_sell_is_neutral_at_same_price() {
        let mut w = Wealth::new(1000.0, 0.0);
        w.buy(100.0);
        assert_eq!(w.shares(), 1);
        assert_eq!(w.cash(), 400.0);
        assert_eq!(w.estimate(120.0), 1020.0);
        w.sell(100.0);
        assert_eq!(w, Wealth::new(1000.0, 0.0));
    }

    #[test]
    fn test_dividends_and_interest() {
        let mut w = Wealth::new(1000.0, 0.01);
        w.buy(100.0);
        w.buy(100.0);
        w.add_dividends(0.5);
        assert!((w.cash() - 301.0).abs() < 1e-9);
        w.accrue_interest();
        assert!((w.bank_deposit() - 505.0).abs() < 1e-9);
    }
}
