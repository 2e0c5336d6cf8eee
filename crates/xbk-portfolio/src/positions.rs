use std::collections::BTreeMap;

use tracing::debug;
use xbk_schemas::{Currency, CurrencyPosition, Exchange, ExchangeCurrencyPosition};

/// Per-currency position store for one venue.
///
/// A report is accepted when its currency is new or its amount differs
/// (exact equality) from the stored one; anything else is suppressed.
#[derive(Debug, Clone)]
pub struct PositionTracker {
    exchange: Exchange,
    positions: BTreeMap<Currency, ExchangeCurrencyPosition>,
}

impl PositionTracker {
    pub fn new(exchange: Exchange) -> Self {
        Self {
            exchange,
            positions: BTreeMap::new(),
        }
    }

    /// Returns the stored, exchange-stamped position when it changed.
    pub fn on_update(&mut self, report: CurrencyPosition) -> Option<ExchangeCurrencyPosition> {
        if let Some(existing) = self.positions.get(&report.currency) {
            if existing.amount == report.amount {
                debug!(currency = %report.currency, amount = report.amount, "position unchanged");
                return None;
            }
        }
        let stamped = report.to_exchange_report(self.exchange.clone());
        self.positions
            .insert(stamped.currency.clone(), stamped.clone());
        Some(stamped)
    }

    pub fn get(&self, currency: &Currency) -> Option<&ExchangeCurrencyPosition> {
        self.positions.get(currency)
    }

    /// All positions, ordered by currency.
    pub fn all(&self) -> impl Iterator<Item = &ExchangeCurrencyPosition> + '_ {
        self.positions.values()
    }
}
