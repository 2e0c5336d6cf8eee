//! Unused-key guard.
//!
//! Every scalar leaf of the effective config is addressed by a JSON Pointer.
//! A leaf is consumed when it equals one of [`CONSUMED_POINTERS`] or sits
//! below one; every other leaf is reported as unused, usually a typo or a
//! stale key.
//!
//! - "/broker/order_ids" consumes "/broker/order_ids" only
//! - "/broker/order_ids" does NOT consume "/broker/order_ids_extra"

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Keys read by [`crate::XbkConfig`]. Keep in sync with the typed view.
pub const CONSUMED_POINTERS: &[&str] = &[
    "/exchange/name",
    "/exchange/exchange",
    "/exchange/make_fee",
    "/exchange/take_fee",
    "/broker/event_capacity",
    "/broker/price_epsilon",
    "/broker/order_ids",
    "/logging/filter",
];

/// Unused keys listed in a `Fail` error before it is cut short.
const FAIL_PREVIEW: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnusedKeyPolicy {
    Warn,
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnusedKeyReport {
    /// Unused leaf pointers (sorted).
    pub unused_leaf_pointers: Vec<String>,
}

impl UnusedKeyReport {
    pub fn is_clean(&self) -> bool {
        self.unused_leaf_pointers.is_empty()
    }
}

/// With `Fail`, unused keys are an error; with `Warn` the report is always
/// returned and the caller decides how loudly to surface it.
pub fn report_unused_keys(config_json: &Value, policy: UnusedKeyPolicy) -> Result<UnusedKeyReport> {
    let mut unused: Vec<String> = leaves(config_json)
        .into_iter()
        .map(|(pointer, _)| pointer)
        .filter(|pointer| !is_consumed(pointer))
        .collect();
    unused.sort();

    let report = UnusedKeyReport {
        unused_leaf_pointers: unused,
    };

    if policy == UnusedKeyPolicy::Fail && !report.is_clean() {
        let shown = &report.unused_leaf_pointers[..report.unused_leaf_pointers.len().min(FAIL_PREVIEW)];
        bail!(
            "CONFIG_UNUSED_KEYS: {} unused config leaf key(s) detected. \
            Remove them or update the consumed registry. First few: {:?}",
            report.unused_leaf_pointers.len(),
            shown
        );
    }

    Ok(report)
}

fn is_consumed(leaf: &str) -> bool {
    CONSUMED_POINTERS.iter().any(|consumed| {
        leaf.strip_prefix(consumed)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

/// Scalar leaves of `v` with their JSON Pointers, in map order. A scalar
/// document is its own leaf at "/".
pub(crate) fn leaves(v: &Value) -> Vec<(String, &Value)> {
    let mut out = Vec::new();
    walk(v, String::new(), &mut out);
    out
}

fn walk<'a>(v: &'a Value, pointer: String, out: &mut Vec<(String, &'a Value)>) {
    match v {
        Value::Object(map) => {
            for (k, child) in map {
                let token = k.replace('~', "~0").replace('/', "~1");
                walk(child, format!("{pointer}/{token}"), out);
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                walk(child, format!("{pointer}/{i}"), out);
            }
        }
        _ if pointer.is_empty() => out.push(("/".to_string(), v)),
        _ => out.push((pointer, v)),
    }
}
