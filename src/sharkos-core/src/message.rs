// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Decoded telemetry message shared by the decoder and its consumers.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::signal::RadioSignal;
use crate::status::StatusReport;

/// Envelope `type` used by the app-level event bus for batched signals.
pub const RADIO_BATCH_TYPE: &str = "radio-batch";

/// A single decoded field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Nested value carried through from a JSON envelope.
    Json(Value),
}

impl FieldValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view; integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(v) => Some(*v),
            FieldValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Convert a JSON value into the closest field variant.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Bool(b) => FieldValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Int(i),
                None => FieldValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => FieldValue::Text(s.clone()),
            other => FieldValue::Json(other.clone()),
        }
    }
}

/// Ordered field map; re-inserting a key keeps its original position.
pub type Fields = IndexMap<String, FieldValue>;

/// Which kind of device message a field map was recognised as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Status,
    RadioSignal,
    Generic,
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MessageKind::Status => "status",
            MessageKind::RadioSignal => "radio_signal",
            MessageKind::Generic => "generic",
        };
        f.write_str(s)
    }
}

/// Why a binary tag stream ended before the end of the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamStop {
    /// A tag or value ran past the end of the buffer.
    Truncated,
    /// Wire type outside {0, 2, 5}.
    UnknownWireType(u8),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedMessage {
    pub kind: MessageKind,
    pub fields: Fields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<StreamStop>,
}

impl DecodedMessage {
    pub fn new(kind: MessageKind, fields: Fields) -> Self {
        Self {
            kind,
            fields,
            stop: None,
        }
    }

    /// True when every byte of the frame was consumed.
    pub fn is_complete(&self) -> bool {
        self.stop.is_none()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn is_status(&self) -> bool {
        self.kind == MessageKind::Status
    }

    pub fn is_radio_signal(&self) -> bool {
        self.kind == MessageKind::RadioSignal
    }

    pub fn status_report(&self) -> Option<StatusReport> {
        self.is_status()
            .then(|| StatusReport::from_fields(&self.fields))
    }

    /// Radio signals carried by this message.
    ///
    /// A radio-signal message yields itself; a `radio-batch` JSON envelope
    /// yields each object in its `signals` array.
    pub fn signals(&self) -> Vec<RadioSignal> {
        if self.is_radio_signal() {
            return vec![RadioSignal::from_fields(&self.fields)];
        }
        if self.get("type").and_then(FieldValue::as_str) != Some(RADIO_BATCH_TYPE) {
            return Vec::new();
        }
        let Some(FieldValue::Json(Value::Array(items))) = self.get("signals") else {
            return Vec::new();
        };
        items
            .iter()
            .filter_map(Value::as_object)
            .map(|obj| {
                let fields: Fields = obj
                    .iter()
                    .map(|(k, v)| (k.clone(), FieldValue::from_json(v)))
                    .collect();
                RadioSignal::from_fields(&fields)
            })
            .collect()
    }
}
