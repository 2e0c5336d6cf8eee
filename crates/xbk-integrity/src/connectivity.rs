//! Edge-triggered connectivity aggregation.
//!
//! # Invariants
//!
//! - Combined status is `Connected` iff market data AND order entry are
//!   both `Connected`.
//! - A change is reported only when the combined status differs from the
//!   last reported one; repeated or partial transitions that leave the
//!   combined value unchanged report nothing.
//! - Channels other than market data and order entry do not take part.
//!
//! Pure state machine: no IO, no clock.

use tracing::{info, warn};
use xbk_schemas::{ConnectivityStatus, GatewayType};

#[derive(Debug, Clone, Default)]
pub struct ConnectivityAggregator {
    market_data: ConnectivityStatus,
    order_entry: ConnectivityStatus,
    /// Last combined value handed out.
    published: ConnectivityStatus,
}

impl ConnectivityAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a channel transition. Returns the new combined status when
    /// it changed.
    pub fn on_channel_status(
        &mut self,
        channel: GatewayType,
        status: ConnectivityStatus,
    ) -> Option<ConnectivityStatus> {
        match channel {
            GatewayType::MarketData => self.market_data = status,
            GatewayType::OrderEntry => self.order_entry = status,
            other => {
                warn!(channel = %other, %status, "connectivity change on untracked channel ignored");
                return None;
            }
        }

        let combined = self.status();
        if combined == self.published {
            return None;
        }
        info!(
            %combined,
            market_data = %self.market_data,
            order_entry = %self.order_entry,
            "venue connectivity changed"
        );
        self.published = combined;
        Some(combined)
    }

    pub fn channel_status(&self, channel: GatewayType) -> Option<ConnectivityStatus> {
        match channel {
            GatewayType::MarketData => Some(self.market_data),
            GatewayType::OrderEntry => Some(self.order_entry),
            GatewayType::Position => None,
        }
    }

    /// Current combined status.
    pub fn status(&self) -> ConnectivityStatus {
        if self.market_data.is_connected() && self.order_entry.is_connected() {
            ConnectivityStatus::Connected
        } else {
            ConnectivityStatus::Disconnected
        }
    }
}

// ---------------------------------------------------------------------------
// Internal unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use ConnectivityStatus::{Connected, Disconnected};

    #[test]
    fn boots_disconnected() {
        let agg = ConnectivityAggregator::new();
        assert_eq!(agg.status(), Disconnected);
        assert_eq!(agg.channel_status(GatewayType::MarketData), Some(Disconnected));
    }

    #[test]
    fn both_channels_required() {
        let mut agg = ConnectivityAggregator::new();
        assert_eq!(agg.on_channel_status(GatewayType::MarketData, Connected), None);
        assert_eq!(
            agg.on_channel_status(GatewayType::OrderEntry, Connected),
            Some(Connected)
        );
        assert_eq!(
            agg.on_channel_status(GatewayType::MarketData, Disconnected),
            Some(Disconnected)
        );
        // Order entry dropping while market data is already down changes nothing.
        assert_eq!(agg.on_channel_status(GatewayType::OrderEntry, Disconnected), None);
    }

    #[test]
    fn repeated_status_is_not_republished() {
        let mut agg = ConnectivityAggregator::new();
        agg.on_channel_status(GatewayType::MarketData, Connected);
        agg.on_channel_status(GatewayType::OrderEntry, Connected);
        assert_eq!(agg.on_channel_status(GatewayType::OrderEntry, Connected), None);
    }

    #[test]
    fn position_channel_is_ignored() {
        let mut agg = ConnectivityAggregator::new();
        agg.on_channel_status(GatewayType::MarketData, Connected);
        assert_eq!(agg.on_channel_status(GatewayType::Position, Connected), None);
        assert_eq!(agg.channel_status(GatewayType::Position), None);
        assert_eq!(agg.status(), Disconnected);
    }
}
