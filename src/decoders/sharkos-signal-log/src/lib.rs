// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Recording sink for decoded telemetry.
//!
//! [`SignalLogConfig`] is the TOML section, [`SignalLoggers`] writes radio
//! signals into per-module CSV files and every decoded message into a
//! JSON-Lines event log with daily rotation.

mod csv;
mod events;

use std::fs::create_dir_all;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use sharkos_core::DecodedMessage;

pub use csv::{format_row, SignalCsvRecorder, CSV_HEADER};
pub use events::EventLog;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

fn default_signal_log_dir() -> String {
    match dirs::data_dir() {
        Some(data_dir) => data_dir
            .join("sharkos")
            .join("signals")
            .to_string_lossy()
            .to_string(),
        None => "logs/signals".to_string(),
    }
}

/// Signal recording configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalLogConfig {
    /// Whether recording is enabled
    pub enabled: bool,
    /// Base directory for CSV and event files
    pub dir: String,
    /// CSV file name template, `%MODULE%` is the radio module number
    pub csv_file: String,
    /// Event log file name template with `%YYYY%`/`%MM%`/`%DD%`
    pub events_file: String,
}

impl Default for SignalLogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: default_signal_log_dir(),
            csv_file: "sharkos_radio_%MODULE%.csv".to_string(),
            events_file: "SHARKOS-%YYYY%-%MM%-%DD%.log".to_string(),
        }
    }
}

pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub struct SignalLoggers {
    csv: SignalCsvRecorder,
    events: EventLog,
}

impl SignalLoggers {
    /// Create loggers from config, or return `None` when recording is disabled.
    pub fn from_config(cfg: &SignalLogConfig) -> Result<Option<Arc<Self>>, String> {
        if !cfg.enabled {
            return Ok(None);
        }

        let base_dir = PathBuf::from(cfg.dir.trim());
        create_dir_all(&base_dir)
            .map_err(|e| format!("create signal log dir '{}': {}", base_dir.display(), e))?;

        let loggers = Self {
            csv: SignalCsvRecorder::new(&base_dir, &cfg.csv_file),
            events: EventLog::open(&base_dir, &cfg.events_file)?,
        };
        Ok(Some(Arc::new(loggers)))
    }

    /// Append the message to the event log and any radio signals it
    /// carries (one, or several for a `radio-batch`) to the CSV files.
    pub fn record(&self, msg: &DecodedMessage) {
        self.events.write_message(msg);
        for signal in msg.signals() {
            self.csv.record(&signal);
        }
    }
}
