//! Command handler modules for xbk-cli.
//!
//! Shared utilities used by multiple command paths live here.
//! Command-specific logic lives in the submodules.

pub mod replay;

use anyhow::Result;
use tracing::warn;
use xbk_config::{report_unused_keys, LoadedConfig, UnusedKeyPolicy};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Install the fmt subscriber on stderr. `RUST_LOG` wins over `default_filter`.
pub fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}

/// Warn about (or, under `Fail`, refuse) config keys nothing reads.
pub fn check_unused_keys(loaded: &LoadedConfig, policy: UnusedKeyPolicy) -> Result<()> {
    let report = report_unused_keys(&loaded.config_json, policy)?;
    for pointer in &report.unused_leaf_pointers {
        warn!(pointer = %pointer, "unused config key");
    }
    Ok(())
}
