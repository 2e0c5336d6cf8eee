//! Strategy intent → brokered command translation.
//!
//! Pure apart from id allocation: replace and cancel draw side, type,
//! time-in-force and the exchange identifier from the last known report of
//! the target chain.

use xbk_schemas::{CancelReplaceOrder, Exchange, OrderCancel, OrderStatusReport, SubmitNewOrder};

use crate::id_source::OrderIdSource;
use crate::types::{BrokeredCancel, BrokeredOrder, BrokeredReplace};

pub struct CommandTranslator {
    exchange: Exchange,
    ids: Box<dyn OrderIdSource + Send>,
}

impl CommandTranslator {
    pub fn new(exchange: Exchange, ids: Box<dyn OrderIdSource + Send>) -> Self {
        Self { exchange, ids }
    }

    pub fn exchange(&self) -> &Exchange {
        &self.exchange
    }

    /// Allocates a fresh client order identifier.
    pub fn new_order(&mut self, intent: &SubmitNewOrder) -> BrokeredOrder {
        BrokeredOrder {
            order_id: self.ids.next_id(),
            side: intent.side,
            quantity: intent.quantity,
            order_type: intent.order_type,
            price: intent.price,
            time_in_force: intent.time_in_force,
            exchange: self.exchange.clone(),
        }
    }

    /// Keeps the original client order identifier.
    pub fn replace(&self, intent: &CancelReplaceOrder, last: &OrderStatusReport) -> BrokeredReplace {
        BrokeredReplace {
            order_id: intent.orig_order_id.clone(),
            side: last.side,
            quantity: intent.quantity,
            order_type: last.order_type,
            price: intent.price,
            time_in_force: last.time_in_force,
            exchange: self.exchange.clone(),
            exchange_order_id: last.exchange_order_id.clone(),
        }
    }

    /// Allocates a fresh request identifier for the cancel itself.
    pub fn cancel(&mut self, intent: &OrderCancel, last: &OrderStatusReport) -> BrokeredCancel {
        BrokeredCancel {
            order_id: intent.orig_order_id.clone(),
            request_id: self.ids.next_id(),
            side: last.side,
            exchange_order_id: last.exchange_order_id.clone(),
        }
    }
}

impl std::fmt::Debug for CommandTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandTranslator")
            .field("exchange", &self.exchange)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id_source::SequenceIdSource;
    use chrono::{DateTime, Utc};
    use xbk_schemas::{OrderStatus, OrderType, Side, TimeInForce};

    fn t0() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn translator() -> CommandTranslator {
        CommandTranslator::new(Exchange::new("paper"), Box::new(SequenceIdSource::new()))
    }

    fn acked_report() -> OrderStatusReport {
        OrderStatusReport {
            order_id: "7".to_string(),
            exchange_order_id: Some("x-7".to_string()),
            side: Side::Sell,
            quantity: 5.0,
            order_type: OrderType::Limit,
            price: 20.0,
            time_in_force: TimeInForce::Ioc,
            status: OrderStatus::Working,
            reject_message: None,
            time: t0(),
            last_quantity: None,
            last_price: None,
            leaves_quantity: 5.0,
            cumulative_quantity: 0.0,
            average_price: None,
            liquidity: None,
            exchange: Exchange::new("paper"),
            computational_latency_micros: None,
            version: 1,
            partially_filled: false,
            pending_cancel: false,
            pending_replace: false,
            cancel_rejected: false,
        }
    }

    #[test]
    fn new_order_copies_intent_and_allocates_id() {
        let mut tr = translator();
        let intent = SubmitNewOrder {
            side: Side::Buy,
            quantity: 3.0,
            order_type: OrderType::Market,
            price: 0.0,
            time_in_force: TimeInForce::Fok,
            generated_time: t0(),
        };
        let a = tr.new_order(&intent);
        let b = tr.new_order(&intent);
        assert_eq!(a.order_id, "1");
        assert_eq!(b.order_id, "2");
        assert_eq!(a.order_type, OrderType::Market);
        assert_eq!(a.exchange.as_str(), "paper");
    }

    #[test]
    fn replace_carries_side_type_tif_from_last_report() {
        let tr = translator();
        let intent = CancelReplaceOrder {
            orig_order_id: "7".to_string(),
            quantity: 8.0,
            price: 21.0,
            generated_time: t0(),
        };
        let r = tr.replace(&intent, &acked_report());
        assert_eq!(r.order_id, "7");
        assert_eq!(r.side, Side::Sell);
        assert_eq!(r.time_in_force, TimeInForce::Ioc);
        assert_eq!(r.quantity, 8.0);
        assert_eq!(r.exchange_order_id.as_deref(), Some("x-7"));
    }

    #[test]
    fn cancel_gets_fresh_request_id() {
        let mut tr = translator();
        let intent = OrderCancel {
            orig_order_id: "7".to_string(),
            generated_time: t0(),
        };
        let c = tr.cancel(&intent, &acked_report());
        assert_eq!(c.order_id, "7");
        assert_eq!(c.request_id, "1");
        assert_eq!(c.side, Side::Sell);
    }
}
