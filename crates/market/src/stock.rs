//! Stock price, dividend and market-signal model.
//!
//! Each round the market settles its order tally through [`Stock::settle`]:
//!
//! ```text
//! dividend  = max(0, scale * N(0, 1))
//! price     = current * (1 + factor * (buys - sells))     (reset to initial if current <= 0)
//! signals   = [dividend vs last, short MA vs last short MA, long MA vs last long MA]
//! ```
//!
//! The adjustment factor is `total_adjustment / trader_count`, so a market
//! where every trader buys moves the price by `total_adjustment`.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};
use types::{MarketQuote, MarketSignal};

/// Configuration for the stock model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockConfig {
    /// Starting price, also the reset price after a crash to zero.
    pub initial_price: f64,
    /// Price move when the whole population trades one way.
    pub total_adjustment: f64,
    /// Standard deviation of the dividend draw.
    pub dividend_scale: f64,
    /// Window of the short moving average signal.
    pub short_window: usize,
    /// Window of the long moving average signal.
    pub long_window: usize,
}

impl Default for StockConfig {
    fn default() -> Self {
        Self {
            initial_price: 100.0,
            total_adjustment: 0.1,
            dividend_scale: 0.1,
            short_window: 10,
            long_window: 50,
        }
    }
}

/// Tracks a simple moving average and the direction it last moved.
///
/// Reports `NoChange` until the window has filled once.
#[derive(Debug, Clone)]
struct AverageTrend {
    window: VecDeque<f64>,
    capacity: usize,
    sum: f64,
    previous: f64,
}

impl AverageTrend {
    fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
            sum: 0.0,
            previous: 0.0,
        }
    }

    fn push(&mut self, value: f64) -> MarketSignal {
        if self.window.len() == self.capacity {
            if let Some(old) = self.window.pop_front() {
                self.sum -= old;
            }
        }
        self.window.push_back(value);
        self.sum += value;

        if self.window.len() < self.capacity {
            return MarketSignal::NoChange;
        }
        let average = self.sum / self.capacity as f64;
        let signal = MarketSignal::compare(average, self.previous);
        self.previous = average;
        signal
    }
}

/// The simulated stock traded by the market actor.
#[derive(Debug, Clone)]
pub struct Stock {
    config: StockConfig,
    adjustment_factor: f64,
    current_price: f64,
    last_dividend: f64,
    short_trend: AverageTrend,
    long_trend: AverageTrend,
    rounds_settled: u64,
    rng: StdRng,
}

impl Stock {
    /// Create a stock for a market with `trader_count` traders.
    pub fn new(config: StockConfig, trader_count: usize) -> Self {
        Self::with_rng(config, trader_count, StdRng::from_os_rng())
    }

    /// Create a stock with a fixed seed (for reproducible runs).
    pub fn with_seed(config: StockConfig, trader_count: usize, seed: u64) -> Self {
        Self::with_rng(config, trader_count, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: StockConfig, trader_count: usize, rng: StdRng) -> Self {
        let adjustment_factor = config.total_adjustment / trader_count.max(1) as f64;
        Self {
            adjustment_factor,
            current_price: config.initial_price,
            last_dividend: 0.0,
            short_trend: AverageTrend::new(config.short_window),
            long_trend: AverageTrend::new(config.long_window),
            rounds_settled: 0,
            rng,
            config,
        }
    }

    /// Current stock price.
    pub fn price(&self) -> f64 {
        self.current_price
    }

    /// Dividend paid in the most recent settlement.
    pub fn last_dividend(&self) -> f64 {
        self.last_dividend
    }

    /// Per-order price sensitivity.
    pub fn adjustment_factor(&self) -> f64 {
        self.adjustment_factor
    }

    /// Number of settlements so far.
    pub fn rounds_settled(&self) -> u64 {
        self.rounds_settled
    }

    /// Price implied by net order flow, without recording it.
    pub fn price_adjustment(&self, buys: u64, sells: u64) -> f64 {
        if self.current_price <= 0.0 {
            return self.config.initial_price;
        }
        let net = buys as f64 - sells as f64;
        self.current_price * (1.0 + self.adjustment_factor * net)
    }

    /// Draw this round's dividend. Never negative.
    pub fn draw_dividend(&mut self) -> f64 {
        let z: f64 = StandardNormal.sample(&mut self.rng);
        (self.config.dividend_scale * z).max(0.0)
    }

    /// Record a new price and dividend and derive the three market signals.
    pub fn observe(&mut self, price: f64, dividend: f64) -> [MarketSignal; 3] {
        self.current_price = price;
        let dividend_signal = MarketSignal::compare(dividend, self.last_dividend);
        self.last_dividend = dividend;
        [
            dividend_signal,
            self.short_trend.push(price),
            self.long_trend.push(price),
        ]
    }

    /// Settle one round of order flow into a quote for the traders.
    pub fn settle(&mut self, buys: u64, sells: u64) -> MarketQuote {
        let dividend = self.draw_dividend();
        let price = self.price_adjustment(buys, sells);
        let signals = self.observe(price, dividend);
        self.rounds_settled += 1;
        MarketQuote::new(price, dividend, signals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock(traders: usize) -> Stock {
        Stock::with_seed(StockConfig::default(), traders, 7)
    }

    #[test]
    fn test_adjustment_factor_scales_with_population() {
        assert!((stock(10).adjustment_factor() - 0.01).abs() < 1e-12);
        // Empty populations must not divide by zero.
        assert!((stock(0).adjustment_factor() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_price_adjustment_follows_net_flow() {
        let s = stock(10);
        assert!((s.price_adjustment(5, 0) - 105.0).abs() < 1e-9);
        assert!((s.price_adjustment(0, 5) - 95.0).abs() < 1e-9);
        assert!((s.price_adjustment(3, 3) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_price_resets_after_crash() {
        let mut s = stock(1);
        s.observe(0.0, 0.0);
        assert_eq!(s.price_adjustment(1, 0), 100.0);
    }

    #[test]
    fn test_dividend_never_negative() {
        let mut s = stock(10);
        for _ in 0..1000 {
            assert!(s.draw_dividend() >= 0.0);
        }
    }

    #[test]
    fn test_seeded_stocks_agree() {
        let mut a = stock(10);
        let mut b = stock(10);
        for _ in 0..20 {
            assert_eq!(a.settle(3, 1), b.settle(3, 1));
        }
    }

    #[test]
    fn test_moving_average_signals_wait_for_full_window() {
        let mut s = stock(1);
        for i in 0..9 {
            let signals = s.observe(100.0 + i as f64, 0.0);
            assert_eq!(signals[1], MarketSignal::NoChange);
        }
        // Tenth price fills the short window; its average beats the initial 0.
        let signals = s.observe(110.0, 0.0);
        assert_eq!(signals[1], MarketSignal::Increase);
        assert_eq!(signals[2], MarketSignal::NoChange);

        // A falling price drags the short average down.
        let signals = s.observe(50.0, 0.0);
        assert_eq!(signals[1], MarketSignal::Decrease);
    }

    #[test]
    fn test_dividend_signal() {
        let mut s = stock(1);
        assert_eq!(s.observe(100.0, 0.2)[0], MarketSignal::Increase);
        assert_eq!(s.observe(100.0, 0.1)[0], MarketSignal::Decrease);
        assert_eq!(s.observe(100.0, 0.1)[0], MarketSignal::NoChange);
    }

    #[test]
    fn test_settle_records_price() {
        let mut s = stock(4);
        let quote = s.settle(4, 0);
        assert!((quote.price - 110.0).abs() < 1e-9);
        assert_eq!(s.price(), quote.price);
        assert_eq!(s.last_dividend(), quote.dividend);
        assert_eq!(s.rounds_settled(), 1);
    }
}
