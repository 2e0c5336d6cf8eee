//! Exchange → client order-ID index
//!
//! # Problem
//!
//! Some exchanges address status updates only by their own order identifier
//! (`exchange_order_id`) and drop the client order identifier the ledger
//! assigned at submit. Such an update cannot be keyed directly into the
//! chain store.
//!
//! # Solution
//!
//! `ExchangeIdIndex` maps:
//!
//! ```text
//! exchange_order_id  →  client order_id
//! ```
//!
//! It is populated opportunistically whenever an applied update carries an
//! exchange identifier, and is consulted ONLY after a direct lookup by
//! client order identifier has failed. It is never authoritative:
//! exchanges may reuse identifiers after cancel/replace, so an entry may be
//! stale. A `None` result means the update is unresolvable; callers MUST NOT
//! guess a chain.

use std::collections::HashMap;

/// Best-effort secondary index from exchange order IDs to client order IDs.
#[derive(Clone, Debug, Default)]
pub struct ExchangeIdIndex {
    /// exchange_order_id → client order_id
    map: HashMap<String, String>,
}

impl ExchangeIdIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or overwrite) the mapping for `exchange_order_id`.
    ///
    /// Overwriting is expected: the latest update that carried the exchange
    /// identifier wins.
    pub fn record(&mut self, exchange_order_id: impl Into<String>, order_id: impl Into<String>) {
        self.map.insert(exchange_order_id.into(), order_id.into());
    }

    /// Fallback lookup. `None` if the exchange identifier was never seen.
    pub fn order_id(&self, exchange_order_id: &str) -> Option<&str> {
        self.map.get(exchange_order_id).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
