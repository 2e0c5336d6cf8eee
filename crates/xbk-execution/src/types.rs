use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use xbk_schemas::{Exchange, OrderType, Side, TimeInForce};

/// Exchange-agnostic new-order command handed to the order-entry channel.
///
/// `order_id` is the client order identifier allocated by the ledger; the
/// gateway must echo it (or an exchange id it can be mapped from) on every
/// subsequent status update.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BrokeredOrder {
    pub order_id: String,
    pub side: Side,
    pub quantity: f64,
    pub order_type: OrderType,
    pub price: f64,
    pub time_in_force: TimeInForce,
    pub exchange: Exchange,
}

/// Amend command. Side, type and time-in-force are carried over from the
/// last known report; quantity and price come from the strategy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BrokeredReplace {
    pub order_id: String,
    pub side: Side,
    pub quantity: f64,
    pub order_type: OrderType,
    pub price: f64,
    pub time_in_force: TimeInForce,
    pub exchange: Exchange,
    /// `None` when the exchange has not acknowledged the order yet.
    pub exchange_order_id: Option<String>,
}

/// Cancel command.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BrokeredCancel {
    /// Client order identifier of the order being cancelled.
    pub order_id: String,
    /// Fresh gateway-facing identifier for the cancel request itself.
    pub request_id: String,
    pub side: Side,
    pub exchange_order_id: Option<String>,
}

/// Synchronous send acknowledgement. Not a fill, not an exchange ack.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentAck {
    pub sent_time: DateTime<Utc>,
}

impl SentAck {
    pub fn at(sent_time: DateTime<Utc>) -> Self {
        Self { sent_time }
    }
}
