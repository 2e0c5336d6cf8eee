//! Inbound gateway events and the outbound broker event stream.

use serde::{Deserialize, Serialize};
use xbk_schemas::{
    ConnectivityStatus, CurrencyPosition, ExchangeCurrencyPosition, Market, MarketUpdate,
    OrderStatusReport, OrderStatusUpdate,
};

// ---------------------------------------------------------------------------
// GatewayEvent (inbound)
// ---------------------------------------------------------------------------

/// Everything the exchange channels can deliver to the broker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GatewayEvent {
    MarketData(MarketUpdate),
    MarketDataConnectivity { status: ConnectivityStatus },
    OrderUpdate(OrderStatusUpdate),
    OrderEntryConnectivity { status: ConnectivityStatus },
    Position(CurrencyPosition),
}

// ---------------------------------------------------------------------------
// BrokerEvent (outbound)
// ---------------------------------------------------------------------------

/// Messages broadcast to subscribers, in emission order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BrokerEvent {
    OrderUpdate(OrderStatusReport),
    PositionUpdate(ExchangeCurrencyPosition),
    MarketData(Market),
    ConnectChanged { status: ConnectivityStatus },
}
