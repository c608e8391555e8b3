// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Per-line handling: decode, render, summarize, record.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use sharkos_core::{DecodedMessage, FieldValue, MessageKind};
use sharkos_protocol::{decode, DecodeError, Decoded, Payload};
use sharkos_signal_log::SignalLoggers;

use crate::config::OutputConfig;

/// JSON shape printed for a decoded message.
pub fn render_message(msg: &DecodedMessage) -> Value {
    json!({
        "kind": msg.kind,
        "complete": msg.is_complete(),
        "fields": &msg.fields,
    })
}

pub fn render(decoded: &Decoded) -> Value {
    match decoded {
        Decoded::PassThrough(value) => value.clone(),
        Decoded::Message(msg) => render_message(msg),
    }
}

fn join_or_none(items: &[&str]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

/// One-line human summary of a message.
pub fn summarize(msg: &DecodedMessage) -> String {
    match msg.kind {
        MessageKind::Status => {
            let Some(report) = msg.status_report() else {
                return "status".to_string();
            };
            let battery = report
                .battery_percent
                .map(|b| format!("{}%", b))
                .unwrap_or_else(|| "?".to_string());
            let scanning = match report.is_scanning {
                Some(true) => ", scanning",
                _ => "",
            };
            format!(
                "status: battery {}{}, connected [{}], disconnected [{}]",
                battery,
                scanning,
                join_or_none(&report.connected_modules()),
                join_or_none(&report.disconnected_modules()),
            )
        }
        MessageKind::RadioSignal => {
            let module = msg
                .get("module")
                .and_then(FieldValue::as_i64)
                .map(|m| m.to_string())
                .unwrap_or_else(|| "?".to_string());
            let freq = msg
                .get("frequency_mhz")
                .and_then(FieldValue::as_f64)
                .map(|f| format!("{:.3} MHz", f))
                .unwrap_or_else(|| "? MHz".to_string());
            let rssi = msg
                .get("rssi")
                .and_then(FieldValue::as_i64)
                .map(|r| format!("{} dBm", r))
                .unwrap_or_else(|| "? dBm".to_string());
            format!("radio: module {}, {}, rssi {}", module, freq, rssi)
        }
        MessageKind::Generic => {
            let signals = msg.signals();
            if signals.is_empty() {
                format!("message: {} fields", msg.fields.len())
            } else {
                format!("radio batch: {} signals", signals.len())
            }
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LineStats {
    pub lines: u64,
    pub status: u64,
    pub radio: u64,
    pub generic: u64,
    pub empty: u64,
    pub malformed: u64,
}

pub struct LineHandler {
    output: OutputConfig,
    sink: Option<Arc<SignalLoggers>>,
    stats: LineStats,
}

impl LineHandler {
    pub fn new(output: OutputConfig, sink: Option<Arc<SignalLoggers>>) -> Self {
        Self {
            output,
            sink,
            stats: LineStats::default(),
        }
    }

    pub fn stats(&self) -> LineStats {
        self.stats
    }

    /// Decode one input line. Returns the JSON text to print, if any.
    pub fn handle(&mut self, line: &str) -> Option<String> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        self.stats.lines += 1;

        let decoded = match decode(Payload::from(line)) {
            Ok(decoded) => decoded,
            Err(e) => {
                self.note_failure(&e, line);
                return None;
            }
        };

        if let Decoded::Message(msg) = &decoded {
            match msg.kind {
                MessageKind::Status => self.stats.status += 1,
                MessageKind::RadioSignal => self.stats.radio += 1,
                MessageKind::Generic => self.stats.generic += 1,
            }
            info!("{}", summarize(msg));
            if let Some(stop) = msg.stop {
                debug!("frame ended early: {:?}", stop);
            }
            if let Some(sink) = &self.sink {
                sink.record(msg);
            }
            if self.output.skip_generic && msg.kind == MessageKind::Generic {
                return None;
            }
        }

        if !self.output.json {
            return None;
        }
        Some(render(&decoded).to_string())
    }

    fn note_failure(&mut self, err: &DecodeError, line: &str) {
        match err {
            DecodeError::EmptyResult => {
                self.stats.empty += 1;
                debug!("no fields in frame: {}", line);
            }
            DecodeError::MalformedTransport(e) => {
                self.stats.malformed += 1;
                warn!("malformed payload ({}): {}", e, line);
            }
        }
    }
}
