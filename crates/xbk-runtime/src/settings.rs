use serde::{Deserialize, Serialize};
use xbk_execution::OrderIdScheme;
use xbk_md::DEFAULT_PRICE_EPSILON;

pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Runtime knobs for one [`crate::BrokerFacade`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerSettings {
    /// Broadcast buffer per subscriber. Slower subscribers observe `Lagged`.
    pub event_capacity: usize,
    /// Absolute threshold for the market-data change flags.
    pub price_epsilon: f64,
    pub order_ids: OrderIdScheme,
}

impl Default for BrokerSettings {
    fn default() -> Self {
        Self {
            event_capacity: DEFAULT_EVENT_CAPACITY,
            price_epsilon: DEFAULT_PRICE_EPSILON,
            order_ids: OrderIdScheme::Clock,
        }
    }
}
