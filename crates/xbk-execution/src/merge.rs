//! Merge of a partial status update onto the last report of a chain.
//!
//! Pure: no I/O, no clock reads (`now` is passed in), no logging. The
//! ledger decides *which* chain an update belongs to; this module decides
//! *what* the next report looks like.
//!
//! Field precedence:
//!
//! - identity/order terms (exchange id, side, quantity, type, price, tif,
//!   status, average price, exchange) fall back to the baseline when absent
//! - `cumulative_quantity` falls back to the baseline and never decreases
//! - `leaves_quantity` is taken from the update, else recomputed when
//!   quantity or cumulative changed, else inherited
//! - event-scoped fields (reject message, last fill, liquidity, latency,
//!   cancel-rejected) are never inherited
//! - pending flags are sticky until an explicit value, a terminal status or
//!   the matching exchange response clears them

use chrono::{DateTime, Utc};
use xbk_schemas::{OrderStatusReport, OrderStatusUpdate};

/// Produce the report that follows `baseline` after applying `update`.
///
/// `order_id` is the resolved chain key (which may differ from
/// `update.order_id` when the update was resolved via the exchange id).
pub fn merge(
    baseline: &OrderStatusReport,
    update: &OrderStatusUpdate,
    order_id: &str,
    now: DateTime<Utc>,
) -> OrderStatusReport {
    let quantity = update.quantity.unwrap_or(baseline.quantity);
    let cumulative_quantity = update
        .cumulative_quantity
        .map(|c| c.max(baseline.cumulative_quantity))
        .unwrap_or(baseline.cumulative_quantity);

    let leaves_quantity = match update.leaves_quantity {
        Some(leaves) => leaves,
        None if update.quantity.is_some() || update.cumulative_quantity.is_some() => {
            (quantity - cumulative_quantity).max(0.0)
        }
        None => baseline.leaves_quantity,
    };

    let status = update.status.unwrap_or(baseline.status);
    let cancel_rejected = update.cancel_rejected.unwrap_or(false);

    let pending_cancel = match update.pending_cancel {
        Some(v) => v,
        None if status.is_terminal() || cancel_rejected => false,
        None => baseline.pending_cancel,
    };
    let pending_replace = match update.pending_replace {
        Some(v) => v,
        None if status.is_terminal() || update.quantity.is_some() || update.price.is_some() => {
            false
        }
        None => baseline.pending_replace,
    };

    OrderStatusReport {
        order_id: order_id.to_string(),
        exchange_order_id: update
            .exchange_order_id
            .clone()
            .or_else(|| baseline.exchange_order_id.clone()),
        side: update.side.unwrap_or(baseline.side),
        quantity,
        order_type: update.order_type.unwrap_or(baseline.order_type),
        price: update.price.unwrap_or(baseline.price),
        time_in_force: update.time_in_force.unwrap_or(baseline.time_in_force),
        status,
        reject_message: update.reject_message.clone(),
        time: update.time.unwrap_or(now),
        last_quantity: update.last_quantity,
        last_price: update.last_price,
        leaves_quantity,
        cumulative_quantity,
        average_price: update.average_price.or(baseline.average_price),
        liquidity: update.liquidity,
        exchange: update
            .exchange
            .clone()
            .unwrap_or_else(|| baseline.exchange.clone()),
        computational_latency_micros: update.computational_latency_micros,
        version: baseline.version + 1,
        partially_filled: cumulative_quantity > 0.0 && cumulative_quantity < quantity,
        pending_cancel,
        pending_replace,
        cancel_rejected,
    }
}

/// `Some(reported)` when `update` reports a cumulative quantity below the
/// baseline's. `merge` clamps such values; callers log them.
pub fn cumulative_regression(baseline: &OrderStatusReport, update: &OrderStatusUpdate) -> Option<f64> {
    update
        .cumulative_quantity
        .filter(|c| *c < baseline.cumulative_quantity)
}
