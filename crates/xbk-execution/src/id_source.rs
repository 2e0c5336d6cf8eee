//! Client order identifier allocation.
//!
//! Identifiers are base-32 strings (digits `0-9a-v`). Every source must
//! return a value never returned before by the same instance.

use chrono::Utc;
use serde::{Deserialize, Serialize};

const DIGITS: &[u8; 32] = b"0123456789abcdefghijklmnopqrstuv";

/// Encode `n` as a lowercase base-32 string.
pub fn encode_base32(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut buf = Vec::with_capacity(13);
    while n > 0 {
        buf.push(DIGITS[(n % 32) as usize]);
        n /= 32;
    }
    buf.reverse();
    buf.into_iter().map(char::from).collect()
}

/// Source of fresh client order identifiers.
pub trait OrderIdSource {
    fn next_id(&mut self) -> String;
}

/// Wall-clock identifiers: nanoseconds since epoch in base 32.
///
/// Strictly increasing per instance; two calls within the same clock tick
/// are bumped by one nanosecond.
#[derive(Debug, Default)]
pub struct ClockIdSource {
    last: u64,
}

impl ClockIdSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderIdSource for ClockIdSource {
    fn next_id(&mut self) -> String {
        let now = Utc::now()
            .timestamp_nanos_opt()
            .map(|n| n.max(0) as u64)
            .unwrap_or(self.last);
        let next = now.max(self.last.saturating_add(1));
        self.last = next;
        encode_base32(next)
    }
}

/// Deterministic counter identifiers: 1, 2, 3, ... in base 32.
///
/// Used for replay and tests where wall-clock ids would make output
/// non-reproducible.
#[derive(Debug)]
pub struct SequenceIdSource {
    next: u64,
}

impl SequenceIdSource {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }
}

impl Default for SequenceIdSource {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderIdSource for SequenceIdSource {
    fn next_id(&mut self) -> String {
        let id = encode_base32(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

/// Configurable choice of id source.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderIdScheme {
    #[default]
    Clock,
    Sequence,
}

impl OrderIdScheme {
    pub fn source(self) -> Box<dyn OrderIdSource + Send> {
        match self {
            OrderIdScheme::Clock => Box::new(ClockIdSource::new()),
            OrderIdScheme::Sequence => Box::new(SequenceIdSource::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn base32_encoding() {
        assert_eq!(encode_base32(0), "0");
        assert_eq!(encode_base32(31), "v");
        assert_eq!(encode_base32(32), "10");
        assert_eq!(encode_base32(1023), "vv");
    }

    #[test]
    fn sequence_ids_are_deterministic() {
        let mut ids = SequenceIdSource::new();
        assert_eq!(ids.next_id(), "1");
        assert_eq!(ids.next_id(), "2");
        let mut ids = SequenceIdSource::starting_at(31);
        assert_eq!(ids.next_id(), "v");
        assert_eq!(ids.next_id(), "10");
    }

    #[test]
    fn scheme_builds_matching_source() {
        let mut ids = OrderIdScheme::Sequence.source();
        assert_eq!(ids.next_id(), "1");
        let scheme: OrderIdScheme = serde_json::from_str("\"clock\"").unwrap();
        assert_eq!(scheme, OrderIdScheme::Clock);
    }

    #[test]
    fn clock_ids_never_repeat() {
        let mut ids = ClockIdSource::new();
        let seen: HashSet<String> = (0..1000).map(|_| ids.next_id()).collect();
        assert_eq!(seen.len(), 1000);
    }
}
