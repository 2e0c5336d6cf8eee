//! Deterministic in-memory "paper" order-entry adapter.
//!
//! Design decisions (kept simple and deterministic):
//! - Every command is recorded in send order and acknowledged immediately.
//! - Nothing is ever filled, acked or rejected by the adapter itself:
//!   exchange-side status arrives only through explicit order updates fed
//!   to the broker (replay input, test scripts).
//! - The send timestamp comes from a [`PaperClock`]; `Fixed` and
//!   `Advancing` make latency figures reproducible.
//! - `fail_with` simulates a transport outage: every send fails until
//!   `recover` is called, and failed sends are not recorded.

use std::cell::{Cell, RefCell};
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;
use xbk_execution::{
    BrokeredCancel, BrokeredOrder, BrokeredReplace, GatewayError, OrderEntryGateway, SentAck,
};

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum PaperClock {
    /// Wall-clock send time.
    Wall,
    /// Every send is stamped with the same instant.
    Fixed(DateTime<Utc>),
    /// First send at `next`, each following send `step` later.
    Advancing {
        next: Cell<DateTime<Utc>>,
        step: Duration,
    },
}

impl PaperClock {
    fn tick(&self) -> DateTime<Utc> {
        match self {
            PaperClock::Wall => Utc::now(),
            PaperClock::Fixed(t) => *t,
            PaperClock::Advancing { next, step } => {
                let t = next.get();
                next.set(t + *step);
                t
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Recorded commands
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub enum SentCommand {
    Order(BrokeredOrder),
    Replace(BrokeredReplace),
    Cancel(BrokeredCancel),
}

impl SentCommand {
    /// Client order id the command refers to.
    pub fn order_id(&self) -> &str {
        match self {
            SentCommand::Order(o) => &o.order_id,
            SentCommand::Replace(r) => &r.order_id,
            SentCommand::Cancel(c) => &c.order_id,
        }
    }
}

/// Simulated transport failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperSendError {
    pub reason: String,
}

impl fmt::Display for PaperSendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "paper order entry unavailable: {}", self.reason)
    }
}

impl std::error::Error for PaperSendError {}

// ---------------------------------------------------------------------------
// PaperOrderEntry
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct PaperOrderEntry {
    clock: PaperClock,
    sent: RefCell<Vec<SentCommand>>,
    failure: RefCell<Option<String>>,
}

impl PaperOrderEntry {
    pub fn new(clock: PaperClock) -> Self {
        Self {
            clock,
            sent: RefCell::new(Vec::new()),
            failure: RefCell::new(None),
        }
    }

    pub fn wall_clock() -> Self {
        Self::new(PaperClock::Wall)
    }

    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::new(PaperClock::Fixed(at))
    }

    pub fn advancing(start: DateTime<Utc>, step: Duration) -> Self {
        Self::new(PaperClock::Advancing {
            next: Cell::new(start),
            step,
        })
    }

    /// Fail every send with `reason` until [`Self::recover`].
    pub fn fail_with(&self, reason: impl Into<String>) {
        *self.failure.borrow_mut() = Some(reason.into());
    }

    pub fn recover(&self) {
        *self.failure.borrow_mut() = None;
    }

    /// All successfully sent commands, in send order.
    pub fn sent(&self) -> Vec<SentCommand> {
        self.sent.borrow().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.borrow().len()
    }

    pub fn orders(&self) -> Vec<BrokeredOrder> {
        self.sent
            .borrow()
            .iter()
            .filter_map(|c| match c {
                SentCommand::Order(o) => Some(o.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn replaces(&self) -> Vec<BrokeredReplace> {
        self.sent
            .borrow()
            .iter()
            .filter_map(|c| match c {
                SentCommand::Replace(r) => Some(r.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn cancels(&self) -> Vec<BrokeredCancel> {
        self.sent
            .borrow()
            .iter()
            .filter_map(|c| match c {
                SentCommand::Cancel(c) => Some(c.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, command: SentCommand) -> Result<SentAck, GatewayError> {
        if let Some(reason) = self.failure.borrow().as_ref() {
            return Err(Box::new(PaperSendError {
                reason: reason.clone(),
            }));
        }
        let sent_time = self.clock.tick();
        debug!(order_id = command.order_id(), %sent_time, "paper send");
        self.sent.borrow_mut().push(command);
        Ok(SentAck::at(sent_time))
    }
}

impl Default for PaperOrderEntry {
    fn default() -> Self {
        Self::wall_clock()
    }
}

impl OrderEntryGateway for PaperOrderEntry {
    fn send_order(&self, order: &BrokeredOrder) -> Result<SentAck, GatewayError> {
        self.record(SentCommand::Order(order.clone()))
    }

    fn replace_order(&self, replace: &BrokeredReplace) -> Result<SentAck, GatewayError> {
        self.record(SentCommand::Replace(replace.clone()))
    }

    fn cancel_order(&self, cancel: &BrokeredCancel) -> Result<SentAck, GatewayError> {
        self.record(SentCommand::Cancel(cancel.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xbk_schemas::{Exchange, OrderType, Side, TimeInForce};

    fn t0() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn order(id: &str) -> BrokeredOrder {
        BrokeredOrder {
            order_id: id.to_string(),
            side: Side::Buy,
            quantity: 1.0,
            order_type: OrderType::Limit,
            price: 1.0,
            time_in_force: TimeInForce::Gtc,
            exchange: Exchange::new("paper"),
        }
    }

    #[test]
    fn advancing_clock_steps_per_send() {
        let gw = PaperOrderEntry::advancing(t0(), Duration::milliseconds(5));
        assert_eq!(gw.send_order(&order("1")).unwrap().sent_time, t0());
        assert_eq!(
            gw.send_order(&order("2")).unwrap().sent_time,
            t0() + Duration::milliseconds(5)
        );
        assert_eq!(gw.orders().len(), 2);
    }

    #[test]
    fn failing_sends_are_not_recorded() {
        let gw = PaperOrderEntry::fixed(t0());
        gw.fail_with("link down");
        let err = gw.send_order(&order("1")).unwrap_err();
        assert_eq!(err.to_string(), "paper order entry unavailable: link down");
        assert_eq!(gw.sent_count(), 0);

        gw.recover();
        assert!(gw.send_order(&order("1")).is_ok());
        assert_eq!(gw.sent()[0].order_id(), "1");
    }
}
