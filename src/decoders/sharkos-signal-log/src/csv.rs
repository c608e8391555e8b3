// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Per-module CSV recording of radio signals.

use std::fs::{create_dir_all, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{info, warn};

use sharkos_core::RadioSignal;

use crate::now_ms;

pub const CSV_HEADER: &str = "timestamp_ms,module,frequency_mhz,rssi,payload_base64,extra";

const UNKNOWN_MODULE: i64 = -1;

/// Quote a cell when it would break the row; newlines become spaces.
fn csv_cell(raw: &str) -> String {
    let flat = raw.replace(['\r', '\n'], " ");
    if flat.contains(',') || flat.contains('"') {
        format!("\"{}\"", flat.replace('"', "\"\""))
    } else {
        flat
    }
}

/// One CSV row for `signal`, with `now_ms` standing in for a missing
/// timestamp.
pub fn format_row(signal: &RadioSignal, now_ms: u64) -> String {
    format!(
        "{},{},{:.6},{},{},{}",
        signal.timestamp_ms.unwrap_or(now_ms),
        signal.module.unwrap_or(UNKNOWN_MODULE),
        signal.frequency_mhz.unwrap_or(0.0),
        signal.rssi.unwrap_or(0),
        csv_cell(signal.payload.as_deref().unwrap_or("")),
        csv_cell(signal.extra.as_deref().unwrap_or("")),
    )
}

struct CsvState {
    module: i64,
    writer: BufWriter<File>,
}

/// Writes each signal to the file of its module. Switching module closes
/// the current file and starts the next one from scratch.
pub struct SignalCsvRecorder {
    base_dir: PathBuf,
    file_template: String,
    state: Mutex<Option<CsvState>>,
}

impl SignalCsvRecorder {
    pub fn new(base_dir: &Path, file_template: &str) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            file_template: file_template.to_string(),
            state: Mutex::new(None),
        }
    }

    pub fn path_for(&self, module: i64) -> PathBuf {
        self.base_dir
            .join(self.file_template.replace("%MODULE%", &module.to_string()))
    }

    fn open_truncated(path: &Path) -> Result<BufWriter<File>, String> {
        if let Some(parent) = path.parent() {
            create_dir_all(parent)
                .map_err(|e| format!("create csv dir '{}': {}", parent.display(), e))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .map_err(|e| format!("open csv '{}': {}", path.display(), e))?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{}", CSV_HEADER)
            .map_err(|e| format!("write csv header '{}': {}", path.display(), e))?;
        Ok(writer)
    }

    pub fn record(&self, signal: &RadioSignal) {
        let module = signal.module.unwrap_or(UNKNOWN_MODULE);
        let Ok(mut guard) = self.state.lock() else {
            warn!("signal csv mutex poisoned");
            return;
        };

        if guard.as_ref().map(|s| s.module) != Some(module) {
            // Dropping the old state closes its file.
            *guard = None;
            let path = self.path_for(module);
            match Self::open_truncated(&path) {
                Ok(writer) => {
                    info!("recording module {} signals to {}", module, path.display());
                    *guard = Some(CsvState { module, writer });
                }
                Err(e) => {
                    warn!("signal csv open failed: {}", e);
                    return;
                }
            }
        }

        let Some(state) = guard.as_mut() else {
            return;
        };
        let row = format_row(signal, now_ms());
        if writeln!(state.writer, "{}", row).is_err() {
            warn!("signal csv write failed for module {}", module);
            return;
        }
        let _ = state.writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(module: Option<i64>) -> RadioSignal {
        RadioSignal {
            module,
            ..RadioSignal::default()
        }
    }

    #[test]
    fn test_format_row_defaults() {
        assert_eq!(format_row(&signal(None), 1234), "1234,-1,0.000000,0,,");
    }

    #[test]
    fn test_format_row_full() {
        let s = RadioSignal {
            timestamp_ms: Some(42),
            module: Some(1),
            frequency_mhz: Some(433.92),
            rssi: Some(-71),
            payload: Some("AQID".to_string()),
            extra: Some("line one\nline two".to_string()),
        };
        assert_eq!(
            format_row(&s, 0),
            "42,1,433.920000,-71,AQID,line one line two"
        );
    }

    #[test]
    fn test_format_row_quotes_commas() {
        let s = RadioSignal {
            extra: Some("a,\"b\"".to_string()),
            ..RadioSignal::default()
        };
        assert!(format_row(&s, 0).ends_with(",\"a,\"\"b\"\"\""));
    }

    #[test]
    fn test_module_switch_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let rec = SignalCsvRecorder::new(dir.path(), "radio_%MODULE%.csv");

        rec.record(&signal(Some(1)));
        rec.record(&signal(Some(1)));
        rec.record(&signal(Some(2)));
        let one = std::fs::read_to_string(rec.path_for(1)).unwrap();
        assert_eq!(one.lines().count(), 3);
        let two = std::fs::read_to_string(rec.path_for(2)).unwrap();
        assert_eq!(two.lines().count(), 2);

        // Returning to module 1 starts its file over.
        rec.record(&signal(Some(1)));
        let one = std::fs::read_to_string(rec.path_for(1)).unwrap();
        assert_eq!(one.lines().collect::<Vec<_>>().len(), 2);
        assert!(one.starts_with(CSV_HEADER));
    }

    #[test]
    fn test_missing_module_goes_to_unknown_file() {
        let dir = tempfile::tempdir().unwrap();
        let rec = SignalCsvRecorder::new(dir.path(), "radio_%MODULE%.csv");
        rec.record(&signal(None));
        assert!(dir.path().join("radio_-1.csv").exists());
    }
}
