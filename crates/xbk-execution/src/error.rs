use xbk_schemas::OrderStatusUpdate;

use crate::order_router::GatewayError;

/// Errors surfaced by the order ledger.
///
/// None of these corrupt ledger state: a failed operation leaves every
/// chain exactly as it was.
#[derive(Debug)]
pub enum LedgerError {
    /// A gateway update matched no chain by client order id, nor via the
    /// exchange-id index. The update was dropped.
    UnresolvedOrder {
        update: Box<OrderStatusUpdate>,
        /// Known client order ids, in insertion order, for diagnostics.
        known_order_ids: Vec<String>,
    },
    /// Replace or cancel named an order the ledger never created.
    UnknownOrderForCommand { order_id: String },
    /// The order-entry gateway failed to send. No report was appended.
    Send {
        order_id: String,
        source: GatewayError,
    },
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerError::UnresolvedOrder {
                update,
                known_order_ids,
            } => write!(
                f,
                "ORDER_UNRESOLVED: update order_id={} exchange_order_id={} matches no known order (known: [{}])",
                update.order_id.as_deref().unwrap_or("-"),
                update.exchange_order_id.as_deref().unwrap_or("-"),
                known_order_ids.join(", ")
            ),
            LedgerError::UnknownOrderForCommand { order_id } => {
                write!(f, "ORDER_UNKNOWN: no order chain for order_id={order_id}")
            }
            LedgerError::Send { order_id, source } => {
                write!(f, "SEND_FAILED: order_id={order_id}: {source}")
            }
        }
    }
}

impl std::error::Error for LedgerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LedgerError::Send { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}
