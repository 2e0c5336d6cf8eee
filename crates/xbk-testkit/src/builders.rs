//! Convenience constructors for common values used by scenario tests.

use chrono::{DateTime, Duration, Utc};
use xbk_schemas::{
    MarketSide, MarketUpdate, OrderStatus, OrderStatusUpdate, OrderType, Side, SubmitNewOrder,
    TimeInForce,
};

/// Epoch seconds of `t(0)`.
pub const T0_SECS: i64 = 1_700_000_000;

/// `T0_SECS` plus `ms` milliseconds.
pub fn t(ms: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(T0_SECS, 0).unwrap_or_default() + Duration::milliseconds(ms)
}

/// GTC limit buy generated at `t(0)`.
pub fn buy(quantity: f64, price: f64) -> SubmitNewOrder {
    limit(Side::Buy, quantity, price)
}

/// GTC limit sell generated at `t(0)`.
pub fn sell(quantity: f64, price: f64) -> SubmitNewOrder {
    limit(Side::Sell, quantity, price)
}

fn limit(side: Side, quantity: f64, price: f64) -> SubmitNewOrder {
    SubmitNewOrder {
        side,
        quantity,
        order_type: OrderType::Limit,
        price,
        time_in_force: TimeInForce::Gtc,
        generated_time: t(0),
    }
}

/// Execution report carrying the cumulative quantity and the last fill.
pub fn fill(
    order_id: &str,
    status: OrderStatus,
    cumulative: f64,
    last_quantity: f64,
    last_price: f64,
) -> OrderStatusUpdate {
    OrderStatusUpdate::for_order(order_id)
        .with_status(status)
        .with_cumulative_quantity(cumulative)
        .with_fill(last_quantity, last_price)
}

/// Top of book stamped at `t(0)`.
pub fn book(bid: (f64, f64), ask: (f64, f64)) -> MarketUpdate {
    MarketUpdate::new(
        MarketSide::new(bid.0, bid.1),
        MarketSide::new(ask.0, ask.1),
        t(0),
    )
}
