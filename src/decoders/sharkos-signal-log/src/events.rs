// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! JSON-Lines event log with daily file rotation.

use std::fs::{create_dir_all, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::warn;

use sharkos_core::DecodedMessage;

use crate::now_ms;

fn expand_date(template: &str, now: DateTime<Utc>) -> String {
    template
        .replace("%YYYY%", &now.format("%Y").to_string())
        .replace("%MM%", &now.format("%m").to_string())
        .replace("%DD%", &now.format("%d").to_string())
}

struct EventState {
    file_name: String,
    writer: BufWriter<File>,
}

pub struct EventLog {
    base_dir: PathBuf,
    file_template: String,
    state: Mutex<EventState>,
}

impl EventLog {
    fn open_append(path: &Path) -> Result<BufWriter<File>, String> {
        if let Some(parent) = path.parent() {
            create_dir_all(parent)
                .map_err(|e| format!("create event log dir '{}': {}", parent.display(), e))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| format!("open event log '{}': {}", path.display(), e))?;
        Ok(BufWriter::new(file))
    }

    pub fn open(base_dir: &Path, template: &str) -> Result<Self, String> {
        let file_name = expand_date(template, Utc::now());
        let writer = Self::open_append(&base_dir.join(&file_name))?;
        Ok(Self {
            base_dir: base_dir.to_path_buf(),
            file_template: template.to_string(),
            state: Mutex::new(EventState { file_name, writer }),
        })
    }

    /// Name of the file currently written to.
    pub fn current_file(&self) -> Option<PathBuf> {
        let state = self.state.lock().ok()?;
        Some(self.base_dir.join(&state.file_name))
    }

    pub fn write_message(&self, msg: &DecodedMessage) {
        let line = json!({
            "ts_ms": now_ms(),
            "kind": msg.kind,
            "complete": msg.is_complete(),
            "fields": &msg.fields,
        });
        let Ok(mut state) = self.state.lock() else {
            warn!("event log mutex poisoned");
            return;
        };

        let next_name = expand_date(&self.file_template, Utc::now());
        if next_name != state.file_name {
            match Self::open_append(&self.base_dir.join(&next_name)) {
                Ok(writer) => {
                    state.file_name = next_name;
                    state.writer = writer;
                }
                Err(e) => {
                    warn!("event log reopen failed: {}", e);
                    return;
                }
            }
        }

        if serde_json::to_writer(&mut state.writer, &line).is_err() {
            warn!("event log serialization failed");
            return;
        }
        if state.writer.write_all(b"\n").is_err() {
            warn!("event log write failed");
            return;
        }
        let _ = state.writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sharkos_core::{FieldValue, Fields, MessageKind, StreamStop};

    #[test]
    fn test_expand_date() {
        let day = Utc.with_ymd_and_hms(2026, 3, 7, 12, 0, 0).unwrap();
        assert_eq!(
            expand_date("SHARKOS-%YYYY%-%MM%-%DD%.log", day),
            "SHARKOS-2026-03-07.log"
        );
        assert_eq!(expand_date("fixed.log", day), "fixed.log");
    }

    #[test]
    fn test_write_message_line() {
        let dir = tempfile::tempdir().unwrap();
        let log = EventLog::open(dir.path(), "events.log").unwrap();

        let mut fields = Fields::new();
        fields.insert("module".to_string(), FieldValue::Int(4));
        fields.insert("rssi".to_string(), FieldValue::Int(-38));
        let mut msg = DecodedMessage::new(MessageKind::RadioSignal, fields);
        msg.stop = Some(StreamStop::Truncated);
        log.write_message(&msg);

        let text = std::fs::read_to_string(log.current_file().unwrap()).unwrap();
        let line: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(line["kind"], "radio_signal");
        assert_eq!(line["complete"], false);
        assert_eq!(line["fields"]["rssi"], -38);
        assert!(line["ts_ms"].as_u64().unwrap() > 0);
    }
}
