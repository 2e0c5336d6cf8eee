use xbk_schemas::Exchange;

/// Static venue metadata supplied by the exchange adapter.
pub trait ExchangeDetails {
    fn name(&self) -> &str;
    fn exchange(&self) -> Exchange;
    /// Maker fee as a fraction of notional.
    fn make_fee(&self) -> f64;
    /// Taker fee as a fraction of notional.
    fn take_fee(&self) -> f64;
}
