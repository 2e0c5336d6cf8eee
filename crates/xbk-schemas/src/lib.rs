//! xbk-schemas
//!
//! Canonical data model shared by every crate of the reconciliation core:
//! order snapshots and partial gateway updates, strategy-level order intents,
//! top-of-book snapshots, currency positions and connectivity values.
//!
//! Everything here is plain data. No IO, no clock reads, no component state.
//! All types are `serde`-serializable so they can be logged, replayed from
//! JSON lines and published to consumers unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};

mod market;
mod orders;

pub use market::{Market, MarketDataFlag, MarketSide, MarketUpdate};
pub use orders::{
    CancelReplaceOrder, OrderCancel, OrderStatusReport, OrderStatusUpdate, SentOrder,
    SubmitNewOrder,
};

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Venue identifier stamped on every report, book and position.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Exchange(pub String);

impl Exchange {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Currency code (e.g. `"BTC"`, `"USD"`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(pub String);

impl Currency {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Order enums
// ---------------------------------------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    Limit,
    Market,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Good till cancelled.
    Gtc,
    /// Immediate or cancel.
    Ioc,
    /// Fill or kill.
    Fok,
}

/// Lifecycle status of an order as last reported.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    New,
    Working,
    Filled,
    Cancelled,
    Rejected,
}

impl OrderStatus {
    /// `true` while the order may still trade (New or Working).
    pub fn is_open(&self) -> bool {
        matches!(self, Self::New | Self::Working)
    }

    /// Returns `true` if no further exchange transitions are expected.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Filled | Self::Cancelled | Self::Rejected)
    }
}

/// Whether a fill added or removed book liquidity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Liquidity {
    Make,
    Take,
}

// ---------------------------------------------------------------------------
// Connectivity
// ---------------------------------------------------------------------------

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectivityStatus {
    Connected,
    #[default]
    Disconnected,
}

impl ConnectivityStatus {
    pub fn is_connected(&self) -> bool {
        *self == Self::Connected
    }
}

impl fmt::Display for ConnectivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connected => write!(f, "CONNECTED"),
            Self::Disconnected => write!(f, "DISCONNECTED"),
        }
    }
}

/// The gateway channel a connectivity change originates from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GatewayType {
    MarketData,
    OrderEntry,
    Position,
}

impl fmt::Display for GatewayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MarketData => write!(f, "market_data"),
            Self::OrderEntry => write!(f, "order_entry"),
            Self::Position => write!(f, "position"),
        }
    }
}

// ---------------------------------------------------------------------------
// Positions
// ---------------------------------------------------------------------------

/// Position report as delivered by the position channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurrencyPosition {
    pub amount: f64,
    pub currency: Currency,
}

impl CurrencyPosition {
    pub fn new(currency: Currency, amount: f64) -> Self {
        Self { amount, currency }
    }

    /// Stamp the report with the venue it was observed on.
    pub fn to_exchange_report(&self, exchange: Exchange) -> ExchangeCurrencyPosition {
        ExchangeCurrencyPosition {
            amount: self.amount,
            currency: self.currency.clone(),
            exchange,
        }
    }
}

/// Stored/published position: one live value per currency.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExchangeCurrencyPosition {
    pub amount: f64,
    pub currency: Currency,
    pub exchange: Exchange,
}
