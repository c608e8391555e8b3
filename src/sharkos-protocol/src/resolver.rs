// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Field semantic resolver.
//!
//! Status reports and radio-signal samples share field numbers. Which
//! meaning applies depends on what has been seen earlier in the same frame:
//! the first status-only field switches the frame into status mode, and it
//! stays there.
//!
//! | Field | Radio signal            | Status                 |
//! |-------|-------------------------|------------------------|
//! | 1 v   | -                       | `is_scanning` (0 or 1) |
//! | 2 v   | `module`                | `battery_percent`      |
//! | 3 v   | -                       | `cc1101_1_connected`   |
//! | 3 f32 | `frequency_mhz`         | -                      |
//! | 4 v   | `rssi` (ZigZag)         | `cc1101_2_connected`   |
//! | 5 v   | -                       | `lora_connected`       |
//! | 5 len | `payload` (base64)      | -                      |
//! | 6 v   | -                       | `nfc_connected`        |
//! | 6 len | `extra` (UTF-8)         | -                      |
//! | 7..10 | -                       | wifi/bluetooth/ir/serial `_connected` |
//!
//! Anything else is kept as `f<N>`, `f<N>_32` or `f<N>_str`.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use sharkos_core::FieldValue;

use crate::wire::{zigzag_decode, TagValue, WireValue};

/// Per-frame classification state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClassState {
    #[default]
    Undetermined,
    Status,
}

impl ClassState {
    pub fn is_status(self) -> bool {
        self == ClassState::Status
    }

    fn enter_status(&mut self) {
        *self = ClassState::Status;
    }
}

/// Status-only boolean flags carried as varints in fields 5..=10.
fn status_flag_name(field: u32) -> Option<&'static str> {
    match field {
        5 => Some("lora_connected"),
        6 => Some("nfc_connected"),
        7 => Some("wifi_connected"),
        8 => Some("bluetooth_connected"),
        9 => Some("ir_connected"),
        10 => Some("serial_connected"),
        _ => None,
    }
}

/// Name and type one record, updating the classification state.
pub fn resolve(tag: TagValue<'_>, state: &mut ClassState) -> (String, FieldValue) {
    let field = tag.field;
    match tag.value {
        WireValue::Varint(v) => resolve_varint(field, v, state),
        WireValue::Fixed32(f) => {
            if field == 3 && !state.is_status() {
                ("frequency_mhz".to_string(), FieldValue::Float(f64::from(f)))
            } else {
                (format!("f{field}_32"), FieldValue::Float(f64::from(f)))
            }
        }
        WireValue::Bytes(bytes) => match field {
            5 if !state.is_status() => (
                "payload".to_string(),
                FieldValue::Text(STANDARD.encode(bytes)),
            ),
            6 if !state.is_status() => (
                "extra".to_string(),
                FieldValue::Text(String::from_utf8_lossy(bytes).into_owned()),
            ),
            _ => (
                format!("f{field}_str"),
                FieldValue::Text(String::from_utf8_lossy(bytes).into_owned()),
            ),
        },
    }
}

fn resolve_varint(field: u32, v: u32, state: &mut ClassState) -> (String, FieldValue) {
    let flag = FieldValue::Bool(v != 0);
    match field {
        // A radio counter of 0 or 1 is indistinguishable from the scanning
        // flag; the device firmware has the same ambiguity.
        1 if v <= 1 => {
            state.enter_status();
            ("is_scanning".to_string(), flag)
        }
        2 if state.is_status() => ("battery_percent".to_string(), FieldValue::Int(i64::from(v))),
        2 => ("module".to_string(), FieldValue::Int(i64::from(v))),
        3 => {
            state.enter_status();
            ("cc1101_1_connected".to_string(), flag)
        }
        4 if state.is_status() => ("cc1101_2_connected".to_string(), flag),
        4 => ("rssi".to_string(), FieldValue::Int(i64::from(zigzag_decode(v)))),
        _ => match status_flag_name(field) {
            Some(name) => {
                state.enter_status();
                (name.to_string(), flag)
            }
            None => (format!("f{field}"), FieldValue::Int(i64::from(v))),
        },
    }
}
