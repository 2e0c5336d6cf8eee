//! xbk-portfolio
//!
//! Exchange-reported currency balances.
//!
//! Positions are not derived from fills; the position channel is the
//! source of truth and this crate only stamps, stores and de-duplicates
//! what it reports.

mod positions;

pub use positions::PositionTracker;
