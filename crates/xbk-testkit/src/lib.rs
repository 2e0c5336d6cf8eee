//! xbk-testkit
//!
//! Deterministic doubles and builders for broker scenario tests.
//!
//! The scenario tests under `tests/` drive a real [`BrokerFacade`] wired to
//! a [`PaperOrderEntry`] with sequence order ids and a stepping send clock,
//! so every report, latency and event order is reproducible.

mod builders;
mod venue;

pub use builders::{book, buy, fill, sell, t, T0_SECS};
pub use venue::StaticExchangeDetails;
pub use xbk_broker_paper::{PaperClock, PaperOrderEntry, SentCommand};

use chrono::Duration;
use tokio::sync::broadcast;
use xbk_execution::SequenceIdSource;
use xbk_runtime::{BrokerEvent, BrokerFacade, BrokerSettings};

pub type PaperFacade = BrokerFacade<PaperOrderEntry, StaticExchangeDetails>;

/// Facade on the "paper" venue: sequence ids ("1", "2", ...), sends
/// stamped at `t(1)`, `t(2)`, ... one millisecond apart.
pub fn paper_facade() -> PaperFacade {
    paper_facade_with(BrokerSettings::default())
}

pub fn paper_facade_with(settings: BrokerSettings) -> PaperFacade {
    BrokerFacade::with_id_source(
        PaperOrderEntry::advancing(t(1), Duration::milliseconds(1)),
        StaticExchangeDetails::paper(),
        &settings,
        Box::new(SequenceIdSource::new()),
    )
}

/// Everything currently buffered for `rx`, in order. Lag is not expected
/// in tests and surfaces as a panic.
pub fn drain(rx: &mut broadcast::Receiver<BrokerEvent>) -> Vec<BrokerEvent> {
    use broadcast::error::TryRecvError;

    let mut out = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(ev) => out.push(ev),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return out,
            Err(TryRecvError::Lagged(n)) => panic!("subscriber lagged by {n} events"),
        }
    }
}
