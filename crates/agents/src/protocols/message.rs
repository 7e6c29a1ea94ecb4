//! Message-passing market protocol.
//!
//! Market and traders only interact through envelopes:
//!
//! ```text
//! round R    trader  ── [action] ──────────────────────────► market
//! round R+1  market  tallies actions, settles the stock
//!            market  ── [price, dividend, s1, s2, s3] ──► every trader
//! round R+2  trader  informs its core, sends the new action
//! ```

use market::Stock;
use types::{ActorId, MarketQuote, RoundAdvance, TradeAction};

use crate::mailbox::Mailbox;
use crate::trader::TraderCore;
use crate::traits::{Actor, ActorError};

/// Market that tallies action envelopes and broadcasts quote envelopes.
pub struct MessageMarket {
    mailbox: Mailbox,
    traders: Vec<ActorId>,
    stock: Stock,
    last_quote: Option<MarketQuote>,
    /// Order counts from the most recent step.
    last_tally: (u64, u64),
}

impl MessageMarket {
    /// Create a market broadcasting to `traders`.
    pub fn new(id: ActorId, traders: Vec<ActorId>, stock: Stock) -> Self {
        Self {
            mailbox: Mailbox::new(id),
            traders,
            stock,
            last_quote: None,
            last_tally: (0, 0),
        }
    }

    pub fn traders(&self) -> &[ActorId] {
        &self.traders
    }

    pub fn stock(&self) -> &Stock {
        &self.stock
    }

    /// Quote broadcast by the most recent step.
    pub fn last_quote(&self) -> Option<&MarketQuote> {
        self.last_quote.as_ref()
    }

    /// `(buys, sells)` tallied by the most recent step.
    pub fn last_tally(&self) -> (u64, u64) {
        self.last_tally
    }
}

impl Actor for MessageMarket {
    fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }

    fn mailbox_mut(&mut self) -> &mut Mailbox {
        &mut self.mailbox
    }

    fn name(&self) -> &str {
        "MessageMarket"
    }

    fn step(&mut self) -> Result<RoundAdvance, ActorError> {
        let id = self.mailbox.id();
        let (mut buys, mut sells) = (0, 0);
        while let Some(envelope) = self.mailbox.receive() {
            match TradeAction::try_from(&envelope).map_err(|e| ActorError::envelope(id, e))? {
                TradeAction::Buy => buys += 1,
                TradeAction::Sell => sells += 1,
                TradeAction::NoAction => {}
            }
        }
        self.last_tally = (buys, sells);

        let quote = self.stock.settle(buys, sells);
        let envelope = quote.to_envelope();
        for &trader in &self.traders {
            self.mailbox.send(trader, envelope.clone());
        }
        self.last_quote = Some(quote);
        Ok(RoundAdvance::ONE)
    }
}

/// Trader that decodes quote envelopes and replies with an action envelope.
pub struct MessageTrader {
    mailbox: Mailbox,
    market: ActorId,
    core: TraderCore,
}

impl MessageTrader {
    pub fn new(id: ActorId, market: ActorId, core: TraderCore) -> Self {
        Self {
            mailbox: Mailbox::new(id),
            market,
            core,
        }
    }

    pub fn market(&self) -> ActorId {
        self.market
    }

    pub fn core(&self) -> &TraderCore {
        &self.core
    }
}

impl Actor for MessageTrader {
    fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }

    fn mailbox_mut(&mut self) -> &mut Mailbox {
        &mut self.mailbox
    }

    fn name(&self) -> &str {
        "MessageTrader"
    }

    fn step(&mut self) -> Result<RoundAdvance, ActorError> {
        let id = self.mailbox.id();
        while let Some(envelope) = self.mailbox.receive() {
            let quote = MarketQuote::try_from(&envelope).map_err(|e| ActorError::envelope(id, e))?;
            self.core.inform(&quote);
        }
        self.mailbox.send(self.market, self.core.action().to_envelope());
        Ok(RoundAdvance::ONE)
    }
}
