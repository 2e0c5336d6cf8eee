//! Scenario: Order Lifecycle Reconciliation
//!
//! # Invariants under test
//!
//! 1. After k gateway updates a chain has k+1 reports with versions 0..=k.
//! 2. A partial fill derives leaves quantity and sets `partially_filled`;
//!    the completing fill clears it.
//! 3. Cancel on a Working order appends a Working report with
//!    `pending_cancel` set and version baseline+1.
//! 4. Zero-valued fields on an update are applied, never treated as absent.

use chrono::{DateTime, Duration, Utc};
use xbk_execution::{
    BrokeredCancel, BrokeredOrder, BrokeredReplace, CommandTranslator, GatewayError,
    OrderEntryGateway, OrderLedger, SentAck, SequenceIdSource,
};
use xbk_schemas::{
    Exchange, OrderCancel, OrderStatus, OrderStatusUpdate, OrderType, Side, SubmitNewOrder,
    TimeInForce,
};

// ---------------------------------------------------------------------------
// Stubs
// ---------------------------------------------------------------------------

struct AckingGateway;

impl OrderEntryGateway for AckingGateway {
    fn send_order(&self, _order: &BrokeredOrder) -> Result<SentAck, GatewayError> {
        Ok(SentAck::at(t(1)))
    }

    fn replace_order(&self, _replace: &BrokeredReplace) -> Result<SentAck, GatewayError> {
        Ok(SentAck::at(t(1)))
    }

    fn cancel_order(&self, _cancel: &BrokeredCancel) -> Result<SentAck, GatewayError> {
        Ok(SentAck::at(t(1)))
    }
}

fn t(ms: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap() + Duration::milliseconds(ms)
}

fn ledger() -> OrderLedger<AckingGateway> {
    OrderLedger::new(
        AckingGateway,
        CommandTranslator::new(Exchange::new("paper"), Box::new(SequenceIdSource::new())),
    )
}

fn limit_buy(quantity: f64, price: f64) -> SubmitNewOrder {
    SubmitNewOrder {
        side: Side::Buy,
        quantity,
        order_type: OrderType::Limit,
        price,
        time_in_force: TimeInForce::Gtc,
        generated_time: t(0),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn partial_then_full_fill_builds_versioned_chain() {
    let mut l = ledger();
    let first = l.submit(&limit_buy(100.0, 10.0)).unwrap();
    let id = first.order_id.clone();
    assert_eq!(first.status, OrderStatus::New);
    assert_eq!(first.version, 0);
    assert_eq!(first.cumulative_quantity, 0.0);

    let partial = l
        .apply_gateway_update(
            OrderStatusUpdate::for_order(&id)
                .with_status(OrderStatus::Working)
                .with_cumulative_quantity(40.0)
                .with_fill(40.0, 10.0),
            t(10),
        )
        .unwrap();
    assert_eq!(partial.version, 1);
    assert!(partial.partially_filled);
    assert_eq!(partial.leaves_quantity, 60.0);

    let filled = l
        .apply_gateway_update(
            OrderStatusUpdate::for_order(&id)
                .with_status(OrderStatus::Filled)
                .with_cumulative_quantity(100.0)
                .with_fill(60.0, 10.0),
            t(20),
        )
        .unwrap();
    assert_eq!(filled.version, 2);
    assert!(!filled.partially_filled);
    assert_eq!(filled.leaves_quantity, 0.0);

    let chain = l.chain(&id).unwrap();
    assert_eq!(chain.len(), 3);
    let versions: Vec<u64> = chain.reports().iter().map(|r| r.version).collect();
    assert_eq!(versions, vec![0, 1, 2]);
}

#[test]
fn cancel_on_working_order_marks_pending_cancel() {
    let mut l = ledger();
    let id = l.submit(&limit_buy(5.0, 1.0)).unwrap().order_id;
    l.apply_gateway_update(
        OrderStatusUpdate::for_order(&id)
            .with_exchange_order_id("x-5")
            .with_status(OrderStatus::Working),
        t(5),
    )
    .unwrap();

    let report = l
        .cancel(
            &OrderCancel {
                orig_order_id: id.clone(),
                generated_time: t(6),
            },
            t(7),
        )
        .unwrap();
    assert_eq!(report.status, OrderStatus::Working);
    assert!(report.pending_cancel);
    assert_eq!(report.version, 2);
    assert_eq!(report.exchange_order_id.as_deref(), Some("x-5"));

    let done = l
        .apply_gateway_update(
            OrderStatusUpdate::for_exchange_order("x-5").with_status(OrderStatus::Cancelled),
            t(8),
        )
        .unwrap();
    assert_eq!(done.order_id, id);
    assert!(!done.pending_cancel);
    assert_eq!(done.version, 3);
}

#[test]
fn zero_values_on_update_are_applied() {
    let mut l = ledger();
    let id = l.submit(&limit_buy(10.0, 25.0)).unwrap().order_id;
    l.apply_gateway_update(
        OrderStatusUpdate::for_order(&id).with_cumulative_quantity(4.0),
        t(2),
    )
    .unwrap();

    let r = l
        .apply_gateway_update(
            OrderStatusUpdate::for_order(&id)
                .with_price(0.0)
                .with_leaves_quantity(0.0),
            t(3),
        )
        .unwrap();
    assert_eq!(r.price, 0.0);
    assert_eq!(r.leaves_quantity, 0.0);
    assert_eq!(r.cumulative_quantity, 4.0);
}

#[test]
fn update_without_time_is_stamped_with_now() {
    let mut l = ledger();
    let id = l.submit(&limit_buy(1.0, 1.0)).unwrap().order_id;
    let r = l
        .apply_gateway_update(OrderStatusUpdate::for_order(&id), t(42))
        .unwrap();
    assert_eq!(r.time, t(42));

    let r = l
        .apply_gateway_update(OrderStatusUpdate::for_order(&id).with_time(t(30)), t(50))
        .unwrap();
    assert_eq!(r.time, t(30));
}
