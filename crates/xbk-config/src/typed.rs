use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use xbk_runtime::{BrokerSettings, ExchangeDetails};
use xbk_schemas::Exchange;

/// Venue metadata handed to the exchange-details provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeSection {
    /// Human-readable venue name.
    pub name: String,
    /// Venue identifier stamped on every report, book and position.
    pub exchange: Exchange,
    #[serde(default)]
    pub make_fee: f64,
    #[serde(default)]
    pub take_fee: f64,
}

impl ExchangeDetails for ExchangeSection {
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

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XbkConfig {
    pub exchange: ExchangeSection,
    #[serde(default)]
    pub broker: BrokerSettings,
    #[serde(default)]
    pub logging: LoggingSection,
}

impl XbkConfig {
    pub fn from_json(config_json: &Value) -> Result<Self> {
        let cfg: XbkConfig = serde_json::from_value(config_json.clone())
            .context("config does not match the expected schema")?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if self.exchange.exchange.as_str().trim().is_empty() {
            bail!("CONFIG_INVALID: /exchange/exchange must not be empty");
        }
        if self.broker.event_capacity == 0 {
            bail!("CONFIG_INVALID: /broker/event_capacity must be at least 1");
        }
        let eps = self.broker.price_epsilon;
        if !eps.is_finite() || eps < 0.0 {
            bail!("CONFIG_INVALID: /broker/price_epsilon must be a finite non-negative number, got {eps}");
        }
        for (ptr, fee) in [
            ("/exchange/make_fee", self.exchange.make_fee),
            ("/exchange/take_fee", self.exchange.take_fee),
        ] {
            if !fee.is_finite() {
                bail!("CONFIG_INVALID: {ptr} must be finite");
            }
        }
        Ok(())
    }
}
