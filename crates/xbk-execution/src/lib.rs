//! xbk-execution
//!
//! Order ledger and command path.
//!
//! - Strategy intents are translated into brokered commands and sent
//!   through an [`OrderEntryGateway`]; the gateway only acknowledges the send.
//! - Every order has one append-only chain of
//!   [`xbk_schemas::OrderStatusReport`]s owned by the [`OrderLedger`].
//! - Partial gateway updates are folded onto the last report by the pure
//!   [`merge`] function.
//!
//! Nothing here publishes events; callers receive the appended reports and
//! decide where they go.

mod commands;
mod error;
mod id_map;
mod id_source;
mod ledger;
mod merge;
mod order_router;
mod types;

pub use commands::CommandTranslator;
pub use error::LedgerError;
pub use id_map::ExchangeIdIndex;
pub use id_source::{
    encode_base32, ClockIdSource, OrderIdScheme, OrderIdSource, SequenceIdSource,
};
pub use ledger::{CancelSweep, OrderChain, OrderLedger};
pub use merge::{cumulative_regression, merge};
pub use order_router::{GatewayError, OrderEntryGateway};
pub use types::{BrokeredCancel, BrokeredOrder, BrokeredReplace, SentAck};
