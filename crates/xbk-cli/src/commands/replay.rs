//! `xbk replay`: drive a paper-venue broker from a JSON-lines script.
//!
//! Each non-blank input line is one [`ReplayStep`]:
//!
//! ```text
//! {"command":{"type":"submit","side":"Buy","quantity":100.0,"order_type":"Limit","price":10.0,"time_in_force":"Gtc","generated_time":"2024-01-02T09:30:00Z"}}
//! {"gateway":{"type":"order_update","order_id":"1","cumulative_quantity":40.0}}
//! {"command":{"type":"cancel_open_orders"}}
//! ```
//!
//! Every event the broker publishes is written as one JSON line. Refused
//! updates and failed commands are anomalies: reported on the diagnostic
//! stream, counted, and the replay moves on. A line that does not parse
//! aborts the replay.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;
use xbk_broker_paper::PaperOrderEntry;
use xbk_config::{ExchangeSection, UnusedKeyPolicy, XbkConfig};
use xbk_execution::LedgerError;
use xbk_runtime::{BrokerEvent, BrokerFacade, GatewayEvent};
use xbk_schemas::{CancelReplaceOrder, OrderCancel, SubmitNewOrder};

use super::{check_unused_keys, init_tracing};

type ReplayFacade = BrokerFacade<PaperOrderEntry, ExchangeSection>;

/// One line of a replay script.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayStep {
    Command(ReplayCommand),
    Gateway(GatewayEvent),
}

/// Strategy-side commands.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplayCommand {
    Submit(SubmitNewOrder),
    Replace(CancelReplaceOrder),
    Cancel(OrderCancel),
    CancelOpenOrders,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub steps: usize,
    pub events: usize,
    pub anomalies: usize,
}

/// Entry point for the `replay` subcommand.
pub fn run(config_paths: &[String], input: &str, fail_on_unused_keys: bool) -> Result<()> {
    let loaded = xbk_config::load_layered_yaml(config_paths)?;
    let cfg = loaded.typed()?;
    init_tracing(&cfg.logging.filter);

    let policy = if fail_on_unused_keys {
        UnusedKeyPolicy::Fail
    } else {
        UnusedKeyPolicy::Warn
    };
    check_unused_keys(&loaded, policy)?;
    info!(config_hash = %loaded.config_hash, venue = %cfg.exchange.exchange, "replay starting");

    let reader: Box<dyn BufRead> = if input == "-" {
        Box::new(io::stdin().lock())
    } else {
        let file = File::open(input)
            .with_context(|| format!("failed to open replay input: {input}"))?;
        Box::new(BufReader::new(file))
    };

    let stdout = io::stdout();
    let stderr = io::stderr();
    let summary = replay(&cfg, reader, &mut stdout.lock(), &mut stderr.lock())?;

    info!(
        steps = summary.steps,
        events = summary.events,
        anomalies = summary.anomalies,
        "replay finished"
    );
    eprintln!(
        "replay_steps={} events={} anomalies={}",
        summary.steps, summary.events, summary.anomalies
    );
    Ok(())
}

/// Replay `input` against a fresh paper-venue facade built from `cfg`.
pub fn replay<R, W, E>(cfg: &XbkConfig, input: R, out: &mut W, diag: &mut E) -> Result<ReplaySummary>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    let mut facade: ReplayFacade =
        BrokerFacade::new(PaperOrderEntry::wall_clock(), cfg.exchange.clone(), &cfg.broker);
    facade.enable_journal();
    let mut summary = ReplaySummary::default();

    for (idx, line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("failed to read replay input line {line_no}"))?;
        let raw = line.trim();
        if raw.is_empty() {
            continue;
        }

        let step: ReplayStep = serde_json::from_str(raw)
            .with_context(|| format!("REPLAY_MALFORMED: line {line_no} is not a replay step"))?;
        summary.steps += 1;

        for anomaly in apply_step(&mut facade, step) {
            summary.anomalies += 1;
            writeln!(diag, "ANOMALY line={line_no}: {anomaly}")?;
        }
        summary.events += write_events(facade.take_journal(), out)?;
    }

    out.flush()?;
    Ok(summary)
}

fn apply_step(facade: &mut ReplayFacade, step: ReplayStep) -> Vec<LedgerError> {
    let result = match step {
        ReplayStep::Gateway(event) => facade.handle(event),
        ReplayStep::Command(ReplayCommand::Submit(intent)) => facade.submit(&intent).map(drop),
        ReplayStep::Command(ReplayCommand::Replace(intent)) => facade.replace(&intent).map(drop),
        ReplayStep::Command(ReplayCommand::Cancel(intent)) => facade.cancel(&intent),
        ReplayStep::Command(ReplayCommand::CancelOpenOrders) => {
            return facade.cancel_open_orders().failures
        }
    };
    result.err().into_iter().collect()
}

/// One JSON line per event; returns the number written.
fn write_events<W: Write>(events: Vec<BrokerEvent>, out: &mut W) -> Result<usize> {
    let written = events.len();
    for event in events {
        serde_json::to_writer(&mut *out, &event).context("failed to encode broker event")?;
        writeln!(out)?;
    }
    Ok(written)
}
