//! Order ledger: owns every order chain and is the only producer of
//! [`OrderStatusReport`]s.
//!
//! # Chains
//!
//! A chain is the append-only history of one client order id. The first
//! report (version 0) is created by `submit`; every later report is the
//! merge of a partial update onto the chain's last report, so
//! `chain[i].version == i` always holds.
//!
//! # Resolution
//!
//! Gateway updates are routed by client order id first. If that fails the
//! [`ExchangeIdIndex`] is consulted. An update that resolves to nothing is
//! refused with [`LedgerError::UnresolvedOrder`] and mutates nothing.
//!
//! Every mutating method returns the appended report(s); the caller owns
//! publication.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};
use xbk_schemas::{
    CancelReplaceOrder, Exchange, OrderCancel, OrderStatus, OrderStatusReport, OrderStatusUpdate,
    SubmitNewOrder,
};

use crate::commands::CommandTranslator;
use crate::error::LedgerError;
use crate::id_map::ExchangeIdIndex;
use crate::merge::{cumulative_regression, merge};
use crate::order_router::OrderEntryGateway;

// ---------------------------------------------------------------------------
// OrderChain
// ---------------------------------------------------------------------------

/// Append-only, never-empty report history of one order.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderChain {
    reports: Vec<OrderStatusReport>,
}

impl OrderChain {
    fn start(first: OrderStatusReport) -> Self {
        Self {
            reports: vec![first],
        }
    }

    fn push(&mut self, report: OrderStatusReport) {
        self.reports.push(report);
    }

    pub fn order_id(&self) -> &str {
        &self.last().order_id
    }

    /// Most recent report (the merge baseline).
    pub fn last(&self) -> &OrderStatusReport {
        // A chain is created with one report and only ever grows.
        &self.reports[self.reports.len() - 1]
    }

    pub fn reports(&self) -> &[OrderStatusReport] {
        &self.reports
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// CancelSweep
// ---------------------------------------------------------------------------

/// Outcome of [`OrderLedger::cancel_open_orders`].
#[derive(Debug, Default)]
pub struct CancelSweep {
    /// Intermediate pending-cancel reports, one per cancel sent.
    pub reports: Vec<OrderStatusReport>,
    /// Orders whose cancel could not be sent.
    pub failures: Vec<LedgerError>,
}

impl CancelSweep {
    pub fn cancelled_ids(&self) -> Vec<&str> {
        self.reports.iter().map(|r| r.order_id.as_str()).collect()
    }
}

// ---------------------------------------------------------------------------
// OrderLedger
// ---------------------------------------------------------------------------

pub struct OrderLedger<G> {
    gateway: G,
    translator: CommandTranslator,
    chains: HashMap<String, OrderChain>,
    /// Client order ids in chain creation order.
    insertion_order: Vec<String>,
    exchange_ids: ExchangeIdIndex,
}

impl<G: OrderEntryGateway> OrderLedger<G> {
    pub fn new(gateway: G, translator: CommandTranslator) -> Self {
        Self {
            gateway,
            translator,
            chains: HashMap::new(),
            insertion_order: Vec::new(),
            exchange_ids: ExchangeIdIndex::new(),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn exchange(&self) -> &Exchange {
        self.translator.exchange()
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Send a new order and open its chain with a `New` report.
    ///
    /// On send failure nothing is recorded.
    pub fn submit(&mut self, intent: &SubmitNewOrder) -> Result<OrderStatusReport, LedgerError> {
        let order = self.translator.new_order(intent);
        let ack = self
            .gateway
            .send_order(&order)
            .map_err(|source| send_failed(&order.order_id, source))?;

        debug_assert!(
            !self.chains.contains_key(&order.order_id),
            "order id source returned a duplicate id"
        );

        let report = OrderStatusReport {
            order_id: order.order_id.clone(),
            exchange_order_id: None,
            side: order.side,
            quantity: order.quantity,
            order_type: order.order_type,
            price: order.price,
            time_in_force: order.time_in_force,
            status: OrderStatus::New,
            reject_message: None,
            time: ack.sent_time,
            last_quantity: None,
            last_price: None,
            leaves_quantity: order.quantity,
            cumulative_quantity: 0.0,
            average_price: None,
            liquidity: None,
            exchange: order.exchange.clone(),
            computational_latency_micros: latency_micros(intent.generated_time, ack.sent_time),
            version: 0,
            partially_filled: false,
            pending_cancel: false,
            pending_replace: false,
            cancel_rejected: false,
        };

        info!(
            order_id = %report.order_id,
            side = %report.side,
            quantity = report.quantity,
            price = report.price,
            "order sent"
        );

        self.insertion_order.push(order.order_id.clone());
        self.chains
            .insert(order.order_id, OrderChain::start(report.clone()));
        Ok(report)
    }

    /// Send an amend and append a `Working` + pending-replace report.
    ///
    /// A terminal order keeps its status; only the pending flag is set.
    pub fn replace(
        &mut self,
        intent: &CancelReplaceOrder,
        now: DateTime<Utc>,
    ) -> Result<OrderStatusReport, LedgerError> {
        let last = self
            .chains
            .get(&intent.orig_order_id)
            .map(OrderChain::last)
            .ok_or_else(|| unknown_order(&intent.orig_order_id))?;
        let status = intermediate_status(last, "replace");
        let replace = self.translator.replace(intent, last);
        let ack = self
            .gateway
            .replace_order(&replace)
            .map_err(|source| send_failed(&replace.order_id, source))?;

        info!(
            order_id = %replace.order_id,
            quantity = replace.quantity,
            price = replace.price,
            "replace sent"
        );

        let update = OrderStatusUpdate {
            status,
            quantity: Some(replace.quantity),
            price: Some(replace.price),
            time: Some(ack.sent_time),
            computational_latency_micros: latency_micros(intent.generated_time, ack.sent_time),
            pending_replace: Some(true),
            ..OrderStatusUpdate::for_order(replace.order_id.clone())
        };
        self.append(&replace.order_id, &update, now)
    }

    /// Send a cancel and append a `Working` + pending-cancel report.
    ///
    /// A terminal order keeps its status; only the pending flag is set.
    pub fn cancel(
        &mut self,
        intent: &OrderCancel,
        now: DateTime<Utc>,
    ) -> Result<OrderStatusReport, LedgerError> {
        let last = self
            .chains
            .get(&intent.orig_order_id)
            .map(OrderChain::last)
            .ok_or_else(|| unknown_order(&intent.orig_order_id))?;
        let status = intermediate_status(last, "cancel");
        let cancel = self.translator.cancel(intent, last);
        let ack = self
            .gateway
            .cancel_order(&cancel)
            .map_err(|source| send_failed(&cancel.order_id, source))?;

        info!(
            order_id = %cancel.order_id,
            request_id = %cancel.request_id,
            "cancel sent"
        );

        let update = OrderStatusUpdate {
            status,
            time: Some(ack.sent_time),
            computational_latency_micros: latency_micros(intent.generated_time, ack.sent_time),
            pending_cancel: Some(true),
            ..OrderStatusUpdate::for_order(cancel.order_id.clone())
        };
        self.append(&cancel.order_id, &update, now)
    }

    /// Cancel every chain whose last report is open and not already
    /// pending cancel. Failures do not stop the sweep.
    pub fn cancel_open_orders(&mut self, now: DateTime<Utc>) -> CancelSweep {
        let targets: Vec<String> = self
            .insertion_order
            .iter()
            .filter(|id| {
                self.chains
                    .get(*id)
                    .map(|c| c.last().status.is_open() && !c.last().pending_cancel)
                    .unwrap_or(false)
            })
            .cloned()
            .collect();

        let mut sweep = CancelSweep::default();
        for order_id in targets {
            let intent = OrderCancel {
                orig_order_id: order_id,
                generated_time: now,
            };
            match self.cancel(&intent, now) {
                Ok(report) => sweep.reports.push(report),
                Err(err) => sweep.failures.push(err),
            }
        }
        sweep
    }

    // -----------------------------------------------------------------------
    // Reconciliation
    // -----------------------------------------------------------------------

    /// Resolve `update` to a chain, merge it onto the last report and append.
    pub fn apply_gateway_update(
        &mut self,
        update: OrderStatusUpdate,
        now: DateTime<Utc>,
    ) -> Result<OrderStatusReport, LedgerError> {
        let Some(order_id) = self.resolve(&update) else {
            let err = LedgerError::UnresolvedOrder {
                known_order_ids: self.insertion_order.clone(),
                update: Box::new(update),
            };
            error!(%err, "dropping unresolvable order update");
            return Err(err);
        };
        self.append(&order_id, &update, now)
    }

    fn resolve(&self, update: &OrderStatusUpdate) -> Option<String> {
        if let Some(id) = update.order_id.as_deref() {
            if self.chains.contains_key(id) {
                return Some(id.to_string());
            }
        }
        let exchange_order_id = update.exchange_order_id.as_deref()?;
        self.exchange_ids
            .order_id(exchange_order_id)
            .filter(|id| self.chains.contains_key(*id))
            .map(str::to_string)
    }

    /// Merge `update` onto the last report of `order_id` and append.
    fn append(
        &mut self,
        order_id: &str,
        update: &OrderStatusUpdate,
        now: DateTime<Utc>,
    ) -> Result<OrderStatusReport, LedgerError> {
        let chain = self
            .chains
            .get_mut(order_id)
            .ok_or_else(|| unknown_order(order_id))?;
        let baseline = chain.last();

        if let Some(reported) = cumulative_regression(baseline, update) {
            warn!(
                order_id,
                reported,
                kept = baseline.cumulative_quantity,
                "cumulative quantity decreased; clamping to previous value"
            );
        }

        let report = merge(baseline, update, order_id, now);
        debug!(
            order_id,
            version = report.version,
            status = ?report.status,
            cumulative = report.cumulative_quantity,
            "order report appended"
        );
        chain.push(report.clone());

        if let Some(exchange_order_id) = update.exchange_order_id.as_deref() {
            self.exchange_ids.record(exchange_order_id, order_id);
        }
        Ok(report)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Every report, grouped by chain in creation order, each chain
    /// chronological.
    pub fn all_order_states(&self) -> impl Iterator<Item = &OrderStatusReport> + '_ {
        self.chains_in_order().flat_map(|c| c.reports().iter())
    }

    pub fn chains_in_order(&self) -> impl Iterator<Item = &OrderChain> + '_ {
        self.insertion_order
            .iter()
            .filter_map(|id| self.chains.get(id))
    }

    pub fn chain(&self, order_id: &str) -> Option<&OrderChain> {
        self.chains.get(order_id)
    }

    pub fn last_report(&self, order_id: &str) -> Option<&OrderStatusReport> {
        self.chains.get(order_id).map(OrderChain::last)
    }

    pub fn resolve_exchange_id(&self, exchange_order_id: &str) -> Option<&str> {
        self.exchange_ids.order_id(exchange_order_id)
    }

    pub fn order_count(&self) -> usize {
        self.chains.len()
    }
}

/// Status forced onto the report appended for an outbound replace/cancel:
/// `Working`, unless the order is already terminal.
fn intermediate_status(last: &OrderStatusReport, command: &str) -> Option<OrderStatus> {
    if last.status.is_terminal() {
        warn!(
            order_id = %last.order_id,
            status = ?last.status,
            command,
            "command sent for an order in a terminal state"
        );
        return None;
    }
    Some(OrderStatus::Working)
}

fn unknown_order(order_id: &str) -> LedgerError {
    LedgerError::UnknownOrderForCommand {
        order_id: order_id.to_string(),
    }
}

fn send_failed(order_id: &str, source: crate::order_router::GatewayError) -> LedgerError {
    let err = LedgerError::Send {
        order_id: order_id.to_string(),
        source,
    };
    error!(%err, "order-entry send failed");
    err
}

fn latency_micros(generated: DateTime<Utc>, sent: DateTime<Utc>) -> Option<i64> {
    (sent - generated).num_microseconds()
}

// ---------------------------------------------------------------------------
// Internal unit tests
// ---------------------------------------------------------------------------
