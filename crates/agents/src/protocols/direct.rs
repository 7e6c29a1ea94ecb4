//! Direct-call market protocol.
//!
//! No envelopes flow: traders write their action straight into a shared
//! [`OrderTally`], and the market calls `inform` on every trader's shared
//! [`TraderCore`] when it settles. Both sides still run as ordinary actors so
//! the engine treats the two protocols identically.
//!
//! Because the market mutates trader state from inside its own step, the
//! outcome depends on the order actors are stepped in. Run direct-call
//! populations with sequential stepping for reproducible results.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use market::Stock;
use parking_lot::Mutex;
use types::{ActorId, MarketQuote, RoundAdvance, TradeAction};

use crate::mailbox::Mailbox;
use crate::trader::TraderCore;
use crate::traits::{Actor, ActorError};

/// Trader state reachable from both the trader and the market.
pub type SharedTrader = Arc<Mutex<TraderCore>>;

/// Buy/sell counters written by traders and drained by the market.
#[derive(Debug, Default)]
pub struct OrderTally {
    buys: AtomicU64,
    sells: AtomicU64,
}

impl OrderTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one trader's action.
    pub fn record(&self, action: TradeAction) {
        match action {
            TradeAction::Buy => {
                self.buys.fetch_add(1, Ordering::Relaxed);
            }
            TradeAction::Sell => {
                self.sells.fetch_add(1, Ordering::Relaxed);
            }
            TradeAction::NoAction => {}
        }
    }

    /// Current `(buys, sells)` without resetting.
    pub fn pending(&self) -> (u64, u64) {
        (
            self.buys.load(Ordering::Relaxed),
            self.sells.load(Ordering::Relaxed),
        )
    }

    /// Take `(buys, sells)` and reset both to zero.
    pub fn take(&self) -> (u64, u64) {
        (
            self.buys.swap(0, Ordering::Relaxed),
            self.sells.swap(0, Ordering::Relaxed),
        )
    }
}

/// Market that settles the shared tally and informs traders directly.
pub struct DirectMarket {
    mailbox: Mailbox,
    traders: Vec<SharedTrader>,
    tally: Arc<OrderTally>,
    stock: Stock,
    last_quote: Option<MarketQuote>,
    /// Inform traders in parallel (each trader core is locked individually).
    parallel_inform: bool,
}

impl DirectMarket {
    pub fn new(id: ActorId, stock: Stock) -> Self {
        Self {
            mailbox: Mailbox::new(id),
            traders: Vec::new(),
            tally: Arc::new(OrderTally::new()),
            stock,
            last_quote: None,
            parallel_inform: false,
        }
    }

    /// Fan `inform` calls out across threads.
    pub fn with_parallel_inform(mut self, enabled: bool) -> Self {
        self.parallel_inform = enabled;
        self
    }

    /// Register a trader core and return the actor that drives it.
    pub fn spawn_trader(&mut self, id: ActorId, core: TraderCore) -> DirectTrader {
        let core = Arc::new(Mutex::new(core));
        self.traders.push(Arc::clone(&core));
        DirectTrader::new(id, core, Arc::clone(&self.tally))
    }

    pub fn trader_count(&self) -> usize {
        self.traders.len()
    }

    pub fn tally(&self) -> &Arc<OrderTally> {
        &self.tally
    }

    pub fn stock(&self) -> &Stock {
        &self.stock
    }

    pub fn last_quote(&self) -> Option<&MarketQuote> {
        self.last_quote.as_ref()
    }
}

impl Actor for DirectMarket {
    fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }

    fn mailbox_mut(&mut self) -> &mut Mailbox {
        &mut self.mailbox
    }

    fn name(&self) -> &str {
        "DirectMarket"
    }

    fn step(&mut self) -> Result<RoundAdvance, ActorError> {
        let (buys, sells) = self.tally.take();
        let quote = self.stock.settle(buys, sells);
        parallel::for_each_slice(
            &self.traders,
            |trader| {
                trader.lock().inform(&quote);
            },
            !self.parallel_inform,
        );
        self.last_quote = Some(quote);
        Ok(RoundAdvance::ONE)
    }
}

/// Trader that reports its latest decision straight to the market tally.
pub struct DirectTrader {
    mailbox: Mailbox,
    core: SharedTrader,
    tally: Arc<OrderTally>,
}

impl DirectTrader {
    pub fn new(id: ActorId, core: SharedTrader, tally: Arc<OrderTally>) -> Self {
        Self {
            mailbox: Mailbox::new(id),
            core,
            tally,
        }
    }

    pub fn core(&self) -> &SharedTrader {
        &self.core
    }
}

impl Actor for DirectTrader {
    fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }

    fn mailbox_mut(&mut self) -> &mut Mailbox {
        &mut self.mailbox
    }

    fn name(&self) -> &str {
        "DirectTrader"
    }

    fn step(&mut self) -> Result<RoundAdvance, ActorError> {
        let action = self.core.lock().action();
        self.tally.record(action);
        Ok(RoundAdvance::ONE)
    }
}
