use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Exchange, Liquidity, OrderStatus, OrderType, Side, TimeInForce};

// ---------------------------------------------------------------------------
// Strategy-level intents
// ---------------------------------------------------------------------------

/// Request to place a new order. The order identifier is assigned by the
/// ledger, never by the strategy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubmitNewOrder {
    pub side: Side,
    pub quantity: f64,
    pub order_type: OrderType,
    pub price: f64,
    pub time_in_force: TimeInForce,
    /// When the strategy generated the intent; the basis of computational latency.
    pub generated_time: DateTime<Utc>,
}

/// Request to amend quantity/price of a live order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CancelReplaceOrder {
    pub orig_order_id: String,
    pub quantity: f64,
    pub price: f64,
    pub generated_time: DateTime<Utc>,
}

/// Request to cancel a live order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderCancel {
    pub orig_order_id: String,
    pub generated_time: DateTime<Utc>,
}

/// Handle returned by submit/replace: the client order identifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentOrder {
    pub order_id: String,
}

// ---------------------------------------------------------------------------
// OrderStatusReport
// ---------------------------------------------------------------------------

/// Immutable snapshot of one order at one point in time.
///
/// Reports are only ever produced by the order ledger; every report of a
/// chain carries `version == index in chain`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderStatusReport {
    /// Client-assigned order identifier (chain key).
    pub order_id: String,
    /// Exchange-assigned identifier; absent until the first ack carries it.
    pub exchange_order_id: Option<String>,
    pub side: Side,
    pub quantity: f64,
    pub order_type: OrderType,
    pub price: f64,
    pub time_in_force: TimeInForce,
    pub status: OrderStatus,
    pub reject_message: Option<String>,
    pub time: DateTime<Utc>,
    pub last_quantity: Option<f64>,
    pub last_price: Option<f64>,
    pub leaves_quantity: f64,
    pub cumulative_quantity: f64,
    pub average_price: Option<f64>,
    pub liquidity: Option<Liquidity>,
    pub exchange: Exchange,
    /// Send time minus intent generation time, in microseconds.
    pub computational_latency_micros: Option<i64>,
    pub version: u64,
    pub partially_filled: bool,
    pub pending_cancel: bool,
    pub pending_replace: bool,
    pub cancel_rejected: bool,
}

// ---------------------------------------------------------------------------
// OrderStatusUpdate
// ---------------------------------------------------------------------------

/// Partial order notification from the order-entry channel (or produced
/// internally for replace/cancel intermediates).
///
/// Every field is optional: `Some` means "present on this update", `None`
/// means "not provided". Zero is a legitimate present value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderStatusUpdate {
    pub order_id: Option<String>,
    pub exchange_order_id: Option<String>,
    pub side: Option<Side>,
    pub quantity: Option<f64>,
    pub order_type: Option<OrderType>,
    pub price: Option<f64>,
    pub time_in_force: Option<TimeInForce>,
    pub status: Option<OrderStatus>,
    pub reject_message: Option<String>,
    pub time: Option<DateTime<Utc>>,
    pub last_quantity: Option<f64>,
    pub last_price: Option<f64>,
    pub leaves_quantity: Option<f64>,
    pub cumulative_quantity: Option<f64>,
    pub average_price: Option<f64>,
    pub liquidity: Option<Liquidity>,
    pub exchange: Option<Exchange>,
    pub computational_latency_micros: Option<i64>,
    pub pending_cancel: Option<bool>,
    pub pending_replace: Option<bool>,
    pub cancel_rejected: Option<bool>,
}

impl OrderStatusUpdate {
    /// Update addressed by client order identifier.
    pub fn for_order(order_id: impl Into<String>) -> Self {
        Self {
            order_id: Some(order_id.into()),
            ..Self::default()
        }
    }

    /// Update addressed only by the exchange-assigned identifier.
    pub fn for_exchange_order(exchange_order_id: impl Into<String>) -> Self {
        Self {
            exchange_order_id: Some(exchange_order_id.into()),
            ..Self::default()
        }
    }

    pub fn with_exchange_order_id(mut self, id: impl Into<String>) -> Self {
        self.exchange_order_id = Some(id.into());
        self
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_cumulative_quantity(mut self, cumulative_quantity: f64) -> Self {
        self.cumulative_quantity = Some(cumulative_quantity);
        self
    }

    pub fn with_leaves_quantity(mut self, leaves_quantity: f64) -> Self {
        self.leaves_quantity = Some(leaves_quantity);
        self
    }

    /// Last fill quantity and price, as carried on an execution report.
    pub fn with_fill(mut self, last_quantity: f64, last_price: f64) -> Self {
        self.last_quantity = Some(last_quantity);
        self.last_price = Some(last_price);
        self
    }

    pub fn with_average_price(mut self, average_price: f64) -> Self {
        self.average_price = Some(average_price);
        self
    }

    pub fn with_reject_message(mut self, msg: impl Into<String>) -> Self {
        self.reject_message = Some(msg.into());
        self
    }

    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }

    pub fn with_cancel_rejected(mut self, cancel_rejected: bool) -> Self {
        self.cancel_rejected = Some(cancel_rejected);
        self
    }
}
