//! Top-of-book normalization.
//!
//! Converts raw [`MarketUpdate`]s into published [`Market`] snapshots with a
//! change-category flag, and suppresses updates whose bid/ask pair is
//! identical to the current book.
//!
//! It does **not**:
//! - build depth (only best bid/ask is tracked)
//! - publish anything (callers receive `Some(Market)` and decide)

use tracing::debug;
use xbk_schemas::{Exchange, Market, MarketDataFlag, MarketSide, MarketUpdate};

/// Absolute difference above which a price or size counts as changed.
pub const DEFAULT_PRICE_EPSILON: f64 = 1e-4;

// ---------------------------------------------------------------------------
// Flag computation
// ---------------------------------------------------------------------------

fn side_flag(current: &MarketSide, previous: &MarketSide, epsilon: f64) -> MarketDataFlag {
    let price_changed = (current.price - previous.price).abs() > epsilon;
    let size_changed = (current.size - previous.size).abs() > epsilon;
    match (price_changed, size_changed) {
        (true, true) => MarketDataFlag::PRICE_AND_SIZE_CHANGED,
        (true, false) => MarketDataFlag::PRICE_CHANGED,
        (false, true) => MarketDataFlag::SIZE_CHANGED,
        (false, false) => MarketDataFlag::NO_CHANGE,
    }
}

/// Flag for `current` relative to the previously published book.
///
/// `First` when there is no previous book; otherwise the bid and ask
/// categories OR-ed together.
pub fn market_data_flag(
    current: &MarketUpdate,
    previous: Option<&Market>,
    epsilon: f64,
) -> MarketDataFlag {
    match previous {
        None => MarketDataFlag::FIRST,
        Some(prev) => {
            side_flag(&current.bid, &prev.update.bid, epsilon)
                | side_flag(&current.ask, &prev.update.ask, epsilon)
        }
    }
}

// ---------------------------------------------------------------------------
// MarketNormalizer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct MarketNormalizer {
    exchange: Exchange,
    epsilon: f64,
    current: Option<Market>,
}

impl MarketNormalizer {
    pub fn new(exchange: Exchange, epsilon: f64) -> Self {
        Self {
            exchange,
            epsilon,
            current: None,
        }
    }

    pub fn with_default_epsilon(exchange: Exchange) -> Self {
        Self::new(exchange, DEFAULT_PRICE_EPSILON)
    }

    /// Apply a raw update. Returns the new current book when it changed,
    /// `None` when the bid/ask pair is identical to the current one.
    pub fn on_update(&mut self, update: MarketUpdate) -> Option<Market> {
        if let Some(current) = &self.current {
            if current.update.same_book(&update) {
                debug!(exchange = %self.exchange, "duplicate top of book suppressed");
                return None;
            }
        }
        let flag = market_data_flag(&update, self.current.as_ref(), self.epsilon);
        let market = Market::new(update, self.exchange.clone(), flag);
        self.current = Some(market.clone());
        Some(market)
    }

    /// Forget the current book. The next update is flagged `First`.
    pub fn reset(&mut self) {
        if self.current.take().is_some() {
            debug!(exchange = %self.exchange, "current book cleared");
        }
    }

    pub fn current(&self) -> Option<&Market> {
        self.current.as_ref()
    }
}
