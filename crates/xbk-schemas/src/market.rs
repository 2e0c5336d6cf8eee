use std::fmt;
use std::ops::BitOr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Exchange;

/// One side of the top of book.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketSide {
    pub price: f64,
    pub size: f64,
}

impl MarketSide {
    pub fn new(price: f64, size: f64) -> Self {
        Self { price, size }
    }
}

/// Raw top-of-book update from the market-data channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketUpdate {
    pub bid: MarketSide,
    pub ask: MarketSide,
    pub time: DateTime<Utc>,
}

impl MarketUpdate {
    pub fn new(bid: MarketSide, ask: MarketSide, time: DateTime<Utc>) -> Self {
        Self { bid, ask, time }
    }

    /// Exact comparison of the raw bid/ask pair. The timestamp is ignored.
    pub fn same_book(&self, other: &MarketUpdate) -> bool {
        self.bid == other.bid && self.ask == other.ask
    }
}

/// Change-category bitmask computed per side and OR-ed across sides.
///
/// Bit values: `NO_CHANGE = 1`, `FIRST = 2`, `PRICE_CHANGED = 4`,
/// `SIZE_CHANGED = 8`, `PRICE_AND_SIZE_CHANGED = 16`. `EMPTY` (0) never
/// appears on a published [`Market`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarketDataFlag(u8);

impl MarketDataFlag {
    pub const EMPTY: Self = Self(0);
    pub const NO_CHANGE: Self = Self(1);
    pub const FIRST: Self = Self(2);
    pub const PRICE_CHANGED: Self = Self(4);
    pub const SIZE_CHANGED: Self = Self(8);
    pub const PRICE_AND_SIZE_CHANGED: Self = Self(16);

    pub fn bits(&self) -> u8 {
        self.0
    }

    /// `true` if every bit of `other` is set in `self`.
    pub fn contains(&self, other: Self) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }
}

impl BitOr for MarketDataFlag {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Debug for MarketDataFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(MarketDataFlag, &str); 5] = [
            (MarketDataFlag::NO_CHANGE, "NoChange"),
            (MarketDataFlag::FIRST, "First"),
            (MarketDataFlag::PRICE_CHANGED, "PriceChanged"),
            (MarketDataFlag::SIZE_CHANGED, "SizeChanged"),
            (MarketDataFlag::PRICE_AND_SIZE_CHANGED, "PriceAndSizeChanged"),
        ];
        let set: Vec<&str> = NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        if set.is_empty() {
            write!(f, "MarketDataFlag(Empty)")
        } else {
            write!(f, "MarketDataFlag({})", set.join(" | "))
        }
    }
}

/// Normalized top-of-book snapshot as published to the strategy layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Market {
    pub update: MarketUpdate,
    pub exchange: Exchange,
    pub flag: MarketDataFlag,
}

impl Market {
    pub fn new(update: MarketUpdate, exchange: Exchange, flag: MarketDataFlag) -> Self {
        Self {
            update,
            exchange,
            flag,
        }
    }
}
