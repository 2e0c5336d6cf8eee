use xbk_runtime::ExchangeDetails;
use xbk_schemas::Exchange;

/// Fixed venue metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct StaticExchangeDetails {
    pub name: String,
    pub exchange: Exchange,
    pub make_fee: f64,
    pub take_fee: f64,
}

impl StaticExchangeDetails {
    pub fn new(name: impl Into<String>, exchange: Exchange, make_fee: f64, take_fee: f64) -> Self {
        Self {
            name: name.into(),
            exchange,
            make_fee,
            take_fee,
        }
    }

    /// "Paper Venue" / `paper`, maker rebate 1bp, taker fee 20bp.
    pub fn paper() -> Self {
        Self::new("Paper Venue", Exchange::new("paper"), -0.0001, 0.002)
    }
}

impl ExchangeDetails for StaticExchangeDetails {
    fn name(&self) -> &str {
        &self.name
    }

    fn exchange(&self) -> Exchange {
        self.exchange.clone()
    }

    fn make_fee(&self) -> f64 {
        self.make_fee
    }

    fn take_fee(&self) -> f64 {
        self.take_fee
    }
}
