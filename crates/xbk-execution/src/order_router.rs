//! Order-entry boundary between the ledger and an exchange adapter.
//!
//! The ledger never talks to an exchange directly. Adapters (live, paper,
//! mock) implement [`OrderEntryGateway`]; each call must return immediately
//! with a send acknowledgement and must not wait for exchange confirmation.
//! Confirmation arrives later as an ordinary order-status update.

use crate::types::{BrokeredCancel, BrokeredOrder, BrokeredReplace, SentAck};

/// Transport-level failure raised by an adapter (connection down, encode
/// failure, ...). Exchange rejections are NOT errors: they arrive as
/// `Rejected` status updates.
pub type GatewayError = Box<dyn std::error::Error + Send + Sync>;

/// Trait that all order-entry adapters must implement.
pub trait OrderEntryGateway {
    fn send_order(&self, order: &BrokeredOrder) -> Result<SentAck, GatewayError>;
    fn replace_order(&self, replace: &BrokeredReplace) -> Result<SentAck, GatewayError>;
    fn cancel_order(&self, cancel: &BrokeredCancel) -> Result<SentAck, GatewayError>;
}

impl<G: OrderEntryGateway + ?Sized> OrderEntryGateway for Box<G> {
    fn send_order(&self, order: &BrokeredOrder) -> Result<SentAck, GatewayError> {
        (**self).send_order(order)
    }

    fn replace_order(&self, replace: &BrokeredReplace) -> Result<SentAck, GatewayError> {
        (**self).replace_order(replace)
    }

    fn cancel_order(&self, cancel: &BrokeredCancel) -> Result<SentAck, GatewayError> {
        (**self).cancel_order(cancel)
    }
}

// ---------------------------------------------------------------------------
// Internal unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use std::cell::RefCell;
    use xbk_schemas::{Exchange, OrderType, Side, TimeInForce};

    #[derive(Default)]
    struct MockGateway {
        sent: RefCell<Vec<String>>,
    }

    impl OrderEntryGateway for MockGateway {
        fn send_order(&self, order: &BrokeredOrder) -> Result<SentAck, GatewayError> {
            self.sent.borrow_mut().push(order.order_id.clone());
            Ok(SentAck::at(t0()))
        }

        fn replace_order(&self, _replace: &BrokeredReplace) -> Result<SentAck, GatewayError> {
            Err("replace not supported".into())
        }

        fn cancel_order(&self, _cancel: &BrokeredCancel) -> Result<SentAck, GatewayError> {
            Ok(SentAck::at(t0()))
        }
    }

    fn t0() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn boxed_gateway_delegates() {
        let gw: Box<dyn OrderEntryGateway> = Box::new(MockGateway::default());
        let order = BrokeredOrder {
            order_id: "ord-1".to_string(),
            side: Side::Buy,
            quantity: 1.0,
            order_type: OrderType::Limit,
            price: 100.0,
            time_in_force: TimeInForce::Gtc,
            exchange: Exchange::new("paper"),
        };
        assert_eq!(gw.send_order(&order).unwrap().sent_time, t0());

        let replace = BrokeredReplace {
            order_id: "ord-1".to_string(),
            side: Side::Buy,
            quantity: 2.0,
            order_type: OrderType::Limit,
            price: 101.0,
            time_in_force: TimeInForce::Gtc,
            exchange: Exchange::new("paper"),
            exchange_order_id: None,
        };
        let err = gw.replace_order(&replace).unwrap_err();
        assert!(err.to_string().contains("not supported"));
    }
}
