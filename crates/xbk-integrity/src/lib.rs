//! xbk-integrity
//!
//! Combined venue connectivity.
//!
//! The venue is usable only while BOTH the market-data and the order-entry
//! channels are connected. A channel that has never reported is treated as
//! disconnected, so the combined state starts `Disconnected` on every boot.

mod connectivity;

pub use connectivity::ConnectivityAggregator;
