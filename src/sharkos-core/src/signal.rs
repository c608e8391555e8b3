// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::message::{FieldValue, Fields};

/// One radio-signal sample reported by a scanning module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RadioSignal {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<u64>,
    /// Radio source id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_mhz: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rssi: Option<i64>,
    /// Captured bytes, base64 encoded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
}

impl RadioSignal {
    pub fn from_fields(fields: &Fields) -> Self {
        Self {
            // Binary frames carry the device timestamp as field 1.
            timestamp_ms: fields
                .get("timestamp_ms")
                .or_else(|| fields.get("f1"))
                .and_then(FieldValue::as_i64)
                .and_then(|v| u64::try_from(v).ok()),
            module: fields.get("module").and_then(FieldValue::as_i64),
            frequency_mhz: fields.get("frequency_mhz").and_then(FieldValue::as_f64),
            rssi: fields.get("rssi").and_then(FieldValue::as_i64),
            payload: fields.get("payload").and_then(payload_to_base64),
            extra: fields
                .get("extra")
                .and_then(FieldValue::as_str)
                .map(str::to_string),
        }
    }
}

/// JSON transports may send the payload as an array of byte values.
fn payload_to_base64(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Text(s) => Some(s.clone()),
        FieldValue::Json(Value::Array(items)) => {
            let bytes: Vec<u8> = items
                .iter()
                .filter_map(Value::as_u64)
                .map(|n| n as u8)
                .collect();
            Some(STANDARD.encode(bytes))
        }
        _ => None,
    }
}
