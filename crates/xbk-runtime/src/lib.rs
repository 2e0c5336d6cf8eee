//! xbk-runtime
//!
//! Wires the ledger, market normalizer, position tracker and connectivity
//! aggregator of one venue behind [`BrokerFacade`].
//!
//! - Inbound: [`GatewayEvent`] (market data, order updates, positions,
//!   channel connectivity) and strategy commands.
//! - Outbound: [`BrokerEvent`] on a single broadcast channel, so every
//!   subscriber sees the same total order of events.

mod events;
mod exchange;
mod facade;
mod settings;

pub use events::{BrokerEvent, GatewayEvent};
pub use exchange::ExchangeDetails;
pub use facade::BrokerFacade;
pub use settings::{BrokerSettings, DEFAULT_EVENT_CAPACITY};
pub use xbk_execution::OrderIdScheme;
