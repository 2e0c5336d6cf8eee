//! xbk-md
//!
//! Market-data normalization for a single venue: keeps the current top of
//! book and flags what changed between consecutive books.

pub mod normalizer;

pub use normalizer::{market_data_flag, MarketNormalizer, DEFAULT_PRICE_EPSILON};
