//! Broker facade: single entry point for one venue.
//!
//! Owns the order ledger, market normalizer, position tracker and
//! connectivity aggregator, routes every inbound [`GatewayEvent`] to the
//! component that owns the affected state, and broadcasts what changed on
//! one [`tokio::sync::broadcast`] channel.
//!
//! Every mutating method takes `&mut self` and runs to completion; events
//! are therefore emitted in exactly the order the mutations happened.

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{debug, info};
use xbk_execution::{
    CancelSweep, CommandTranslator, LedgerError, OrderEntryGateway, OrderIdSource, OrderLedger,
};
use xbk_integrity::ConnectivityAggregator;
use xbk_md::MarketNormalizer;
use xbk_portfolio::PositionTracker;
use xbk_schemas::{
    CancelReplaceOrder, ConnectivityStatus, Currency, CurrencyPosition, Exchange,
    ExchangeCurrencyPosition, GatewayType, Market, MarketUpdate, OrderCancel, OrderStatusReport,
    OrderStatusUpdate, SentOrder, SubmitNewOrder,
};

use crate::events::{BrokerEvent, GatewayEvent};
use crate::exchange::ExchangeDetails;
use crate::settings::BrokerSettings;

pub struct BrokerFacade<G, D> {
    details: D,
    ledger: OrderLedger<G>,
    market: MarketNormalizer,
    positions: PositionTracker,
    connectivity: ConnectivityAggregator,
    bus: broadcast::Sender<BrokerEvent>,
    journal: Option<Vec<BrokerEvent>>,
}

impl<G: OrderEntryGateway, D: ExchangeDetails> BrokerFacade<G, D> {
    pub fn new(gateway: G, details: D, settings: &BrokerSettings) -> Self {
        Self::with_id_source(gateway, details, settings, settings.order_ids.source())
    }

    pub fn with_id_source(
        gateway: G,
        details: D,
        settings: &BrokerSettings,
        ids: Box<dyn OrderIdSource + Send>,
    ) -> Self {
        let exchange = details.exchange();
        // broadcast::channel panics on zero capacity.
        let (bus, _rx) = broadcast::channel(settings.event_capacity.max(1));
        info!(
            name = details.name(),
            exchange = %exchange,
            capacity = settings.event_capacity,
            epsilon = settings.price_epsilon,
            "broker facade ready"
        );
        Self {
            ledger: OrderLedger::new(gateway, CommandTranslator::new(exchange.clone(), ids)),
            market: MarketNormalizer::new(exchange.clone(), settings.price_epsilon),
            positions: PositionTracker::new(exchange),
            connectivity: ConnectivityAggregator::new(),
            details,
            bus,
            journal: None,
        }
    }

    /// New receiver of every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<BrokerEvent> {
        self.bus.subscribe()
    }

    /// Keep every event published from now on until [`Self::take_journal`].
    ///
    /// Broadcast receivers lag once a single call emits more than
    /// `event_capacity` events; the journal has no such bound.
    pub fn enable_journal(&mut self) {
        self.journal.get_or_insert_with(Vec::new);
    }

    /// Events journaled since the previous call, in emission order. Empty
    /// when the journal is not enabled.
    pub fn take_journal(&mut self) -> Vec<BrokerEvent> {
        self.journal.as_mut().map(std::mem::take).unwrap_or_default()
    }

    fn publish(&mut self, event: BrokerEvent) {
        if let Some(journal) = self.journal.as_mut() {
            journal.push(event.clone());
        }
        // No subscribers is not an error.
        if self.bus.send(event).is_err() {
            debug!("broker event dropped: no subscribers");
        }
    }

    // -----------------------------------------------------------------------
    // Inbound gateway events
    // -----------------------------------------------------------------------

    /// Route one inbound event. Only order updates can fail.
    pub fn handle(&mut self, event: GatewayEvent) -> Result<(), LedgerError> {
        match event {
            GatewayEvent::MarketData(update) => self.on_market_data(update),
            GatewayEvent::MarketDataConnectivity { status } => {
                self.on_market_data_connectivity(status)
            }
            GatewayEvent::OrderUpdate(update) => return self.on_order_update(update),
            GatewayEvent::OrderEntryConnectivity { status } => {
                self.on_order_entry_connectivity(status)
            }
            GatewayEvent::Position(report) => self.on_position(report),
        }
        Ok(())
    }

    pub fn on_market_data(&mut self, update: MarketUpdate) {
        if let Some(market) = self.market.on_update(update) {
            self.publish(BrokerEvent::MarketData(market));
        }
    }

    /// A disconnect clears the current book before connectivity is updated.
    pub fn on_market_data_connectivity(&mut self, status: ConnectivityStatus) {
        if !status.is_connected() {
            self.market.reset();
        }
        self.on_channel_status(GatewayType::MarketData, status);
    }

    pub fn on_order_entry_connectivity(&mut self, status: ConnectivityStatus) {
        self.on_channel_status(GatewayType::OrderEntry, status);
    }

    fn on_channel_status(&mut self, channel: GatewayType, status: ConnectivityStatus) {
        if let Some(combined) = self.connectivity.on_channel_status(channel, status) {
            self.publish(BrokerEvent::ConnectChanged { status: combined });
        }
    }

    pub fn on_order_update(&mut self, update: OrderStatusUpdate) -> Result<(), LedgerError> {
        let report = self.ledger.apply_gateway_update(update, Utc::now())?;
        self.publish(BrokerEvent::OrderUpdate(report));
        Ok(())
    }

    pub fn on_position(&mut self, report: CurrencyPosition) {
        if let Some(position) = self.positions.on_update(report) {
            self.publish(BrokerEvent::PositionUpdate(position));
        }
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    pub fn submit(&mut self, intent: &SubmitNewOrder) -> Result<SentOrder, LedgerError> {
        let report = self.ledger.submit(intent)?;
        let sent = SentOrder {
            order_id: report.order_id.clone(),
        };
        self.publish(BrokerEvent::OrderUpdate(report));
        Ok(sent)
    }

    pub fn replace(&mut self, intent: &CancelReplaceOrder) -> Result<SentOrder, LedgerError> {
        let report = self.ledger.replace(intent, Utc::now())?;
        let sent = SentOrder {
            order_id: report.order_id.clone(),
        };
        self.publish(BrokerEvent::OrderUpdate(report));
        Ok(sent)
    }

    pub fn cancel(&mut self, intent: &OrderCancel) -> Result<(), LedgerError> {
        let report = self.ledger.cancel(intent, Utc::now())?;
        self.publish(BrokerEvent::OrderUpdate(report));
        Ok(())
    }

    /// Cancel every open order not already pending cancel.
    pub fn cancel_open_orders(&mut self) -> CancelSweep {
        let sweep = self.ledger.cancel_open_orders(Utc::now());
        for report in &sweep.reports {
            self.publish(BrokerEvent::OrderUpdate(report.clone()));
        }
        info!(
            cancelled = sweep.reports.len(),
            failed = sweep.failures.len(),
            "cancel sweep finished"
        );
        sweep
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn get_position(&self, currency: &Currency) -> Option<&ExchangeCurrencyPosition> {
        self.positions.get(currency)
    }

    pub fn positions(&self) -> impl Iterator<Item = &ExchangeCurrencyPosition> + '_ {
        self.positions.all()
    }

    pub fn current_book(&self) -> Option<&Market> {
        self.market.current()
    }

    pub fn connect_status(&self) -> ConnectivityStatus {
        self.connectivity.status()
    }

    pub fn all_order_states(&self) -> impl Iterator<Item = &OrderStatusReport> + '_ {
        self.ledger.all_order_states()
    }

    pub fn ledger(&self) -> &OrderLedger<G> {
        &self.ledger
    }

    pub fn name(&self) -> &str {
        self.details.name()
    }

    pub fn exchange(&self) -> Exchange {
        self.details.exchange()
    }

    pub fn make_fee(&self) -> f64 {
        self.details.make_fee()
    }

    pub fn take_fee(&self) -> f64 {
        self.details.take_fee()
    }
}

// ---------------------------------------------------------------------------
// Internal unit tests
// ---------------------------------------------------------------------------
