// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

use serde::{Deserialize, Serialize};

use crate::message::{FieldValue, Fields};

/// Connectivity flag names reported in a device status message, paired with
/// the hardware they describe.
pub const MODULE_FLAGS: [(&str, &str); 8] = [
    ("cc1101_1_connected", "cc1101_1"),
    ("cc1101_2_connected", "cc1101_2"),
    ("lora_connected", "lora"),
    ("nfc_connected", "nfc"),
    ("wifi_connected", "wifi"),
    ("bluetooth_connected", "bluetooth"),
    ("ir_connected", "ir"),
    ("serial_connected", "serial"),
];

/// Periodic device status report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    pub is_scanning: Option<bool>,
    pub battery_percent: Option<i64>,
    pub cc1101_1_connected: Option<bool>,
    pub cc1101_2_connected: Option<bool>,
    pub lora_connected: Option<bool>,
    pub nfc_connected: Option<bool>,
    pub wifi_connected: Option<bool>,
    pub bluetooth_connected: Option<bool>,
    pub ir_connected: Option<bool>,
    pub serial_connected: Option<bool>,
}

impl StatusReport {
    pub fn from_fields(fields: &Fields) -> Self {
        let flag = |name: &str| fields.get(name).and_then(FieldValue::as_bool);
        Self {
            is_scanning: flag("is_scanning"),
            battery_percent: fields.get("battery_percent").and_then(FieldValue::as_i64),
            cc1101_1_connected: flag("cc1101_1_connected"),
            cc1101_2_connected: flag("cc1101_2_connected"),
            lora_connected: flag("lora_connected"),
            nfc_connected: flag("nfc_connected"),
            wifi_connected: flag("wifi_connected"),
            bluetooth_connected: flag("bluetooth_connected"),
            ir_connected: flag("ir_connected"),
            serial_connected: flag("serial_connected"),
        }
    }

    fn flags(&self) -> [Option<bool>; 8] {
        [
            self.cc1101_1_connected,
            self.cc1101_2_connected,
            self.lora_connected,
            self.nfc_connected,
            self.wifi_connected,
            self.bluetooth_connected,
            self.ir_connected,
            self.serial_connected,
        ]
    }

    fn modules_where(&self, want: bool) -> Vec<&'static str> {
        MODULE_FLAGS
            .iter()
            .zip(self.flags())
            .filter(|(_, flag)| *flag == Some(want))
            .map(|((_, module), _)| *module)
            .collect()
    }

    /// Hardware modules reported as connected.
    pub fn connected_modules(&self) -> Vec<&'static str> {
        self.modules_where(true)
    }

    /// Hardware modules explicitly reported as missing.
    pub fn disconnected_modules(&self) -> Vec<&'static str> {
        self.modules_where(false)
    }
}

/// True when `name` is only ever produced by a status message.
pub fn is_status_field(name: &str) -> bool {
    name == "is_scanning"
        || name == "battery_percent"
        || MODULE_FLAGS.iter().any(|(flag, _)| *flag == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connected_and_disconnected_modules() {
        let mut fields = Fields::new();
        fields.insert("is_scanning".into(), FieldValue::Bool(true));
        fields.insert("battery_percent".into(), FieldValue::Int(64));
        fields.insert("cc1101_1_connected".into(), FieldValue::Bool(true));
        fields.insert("lora_connected".into(), FieldValue::Bool(false));
        fields.insert("serial_connected".into(), FieldValue::Bool(true));

        let report = StatusReport::from_fields(&fields);
        assert_eq!(report.battery_percent, Some(64));
        assert_eq!(report.connected_modules(), vec!["cc1101_1", "serial"]);
        assert_eq!(report.disconnected_modules(), vec!["lora"]);
    }

    #[test]
    fn test_status_field_names() {
        assert!(is_status_field("is_scanning"));
        assert!(is_status_field("battery_percent"));
        assert!(is_status_field("ir_connected"));
        assert!(!is_status_field("module"));
        assert!(!is_status_field("rssi"));
    }
}
