// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

use serde_json::json;

use sharkos_protocol::encode::FrameEncoder;
use sharkos_protocol::wire::zigzag_encode;
use sharkos_protocol::{
    decode, decode_frame, decode_text, Decoded, FieldValue, MessageKind, Payload, StreamStop,
};

const DEVICE_FRAME: &str =
    "PROTO:qlUvAAix+wUQBB0AQBlFIEsqBE9wZW4yGkFzQVN0YXJQZXJmb3JtaW5nQXJ0c0d1ZXN0";

fn status_frame() -> FrameEncoder {
    FrameEncoder::new()
        .with_header()
        .bool(1, true)
        .varint(2, 76)
        .bool(3, true)
        .bool(4, false)
        .bool(5, true)
        .bool(6, false)
        .bool(7, true)
        .bool(8, true)
        .bool(9, false)
        .bool(10, true)
}

fn radio_frame() -> FrameEncoder {
    FrameEncoder::new()
        .varint(2, 3)
        .fixed32(3, 433.92)
        .sint(4, -72)
        .text(6, "OOK 2.4k")
}

#[test]
fn status_frame_round_trip() {
    let msg = decode_text(&status_frame().to_transport()).unwrap();
    assert_eq!(msg.kind, MessageKind::Status);
    assert!(msg.is_complete());
    assert_eq!(msg.fields.len(), 10);

    let expected = [
        ("is_scanning", FieldValue::Bool(true)),
        ("battery_percent", FieldValue::Int(76)),
        ("cc1101_1_connected", FieldValue::Bool(true)),
        ("cc1101_2_connected", FieldValue::Bool(false)),
        ("lora_connected", FieldValue::Bool(true)),
        ("nfc_connected", FieldValue::Bool(false)),
        ("wifi_connected", FieldValue::Bool(true)),
        ("bluetooth_connected", FieldValue::Bool(true)),
        ("ir_connected", FieldValue::Bool(false)),
        ("serial_connected", FieldValue::Bool(true)),
    ];
    for (name, value) in expected {
        assert_eq!(msg.get(name), Some(&value), "field {name}");
    }

    let report = msg.status_report().unwrap();
    assert_eq!(
        report.connected_modules(),
        vec!["cc1101_1", "lora", "wifi", "bluetooth", "serial"]
    );
}

#[test]
fn radio_frame_round_trip() {
    let msg = decode_frame(&radio_frame().finish()).unwrap();
    assert_eq!(msg.kind, MessageKind::RadioSignal);
    assert_eq!(msg.get("module"), Some(&FieldValue::Int(3)));
    assert_eq!(msg.get("rssi"), Some(&FieldValue::Int(-72)));
    assert_eq!(
        msg.get("extra"),
        Some(&FieldValue::Text("OOK 2.4k".to_string()))
    );
    let freq = msg.get("frequency_mhz").and_then(FieldValue::as_f64).unwrap();
    assert!((freq - f64::from(433.92_f32)).abs() < 1e-5);
}

#[test]
fn rssi_zigzag_inverse() {
    for r in -1000..=1000 {
        let frame = FrameEncoder::new().varint(4, zigzag_encode(r)).finish();
        let msg = decode_frame(&frame).unwrap();
        assert_eq!(msg.get("rssi"), Some(&FieldValue::Int(i64::from(r))), "rssi {r}");
    }
}

#[test]
fn truncation_keeps_complete_records() {
    let enc = radio_frame();
    let full = enc.finish();
    // Byte offsets where each record ends.
    let record_ends = [2, 7, 10, full.len()];

    for cut in 1..full.len() {
        let result = decode_frame(&full[..cut]);
        let complete = record_ends.iter().filter(|&&end| end <= cut).count();
        if complete == 0 {
            assert!(result.unwrap_err().is_empty_result(), "cut {cut}");
            continue;
        }
        let msg = result.unwrap();
        assert_eq!(msg.fields.len(), complete, "cut {cut}");
        assert_eq!(msg.get("module"), Some(&FieldValue::Int(3)));
        if !record_ends.contains(&cut) {
            assert_eq!(msg.stop, Some(StreamStop::Truncated), "cut {cut}");
        }
    }
}

#[test]
fn device_frame_decodes_by_byte_layout() {
    let msg = decode_text(DEVICE_FRAME).unwrap();
    // Field 1 carries a counter (not 0/1) and field 3 a float, so nothing in
    // this frame is status-only.
    assert_eq!(msg.kind, MessageKind::RadioSignal);
    assert!(msg.is_complete());
    assert_eq!(msg.get("f1"), Some(&FieldValue::Int(97713)));
    assert_eq!(msg.get("module"), Some(&FieldValue::Int(4)));
    assert_eq!(msg.get("frequency_mhz"), Some(&FieldValue::Float(2452.0)));
    assert_eq!(msg.get("rssi"), Some(&FieldValue::Int(-38)));
    assert_eq!(
        msg.get("payload"),
        Some(&FieldValue::Text("T3Blbg==".to_string()))
    );
    assert_eq!(
        msg.get("extra"),
        Some(&FieldValue::Text("AsAStarPerformingArtsGuest".to_string()))
    );
    assert!(msg.get("is_scanning").is_none());
}

#[test]
fn device_frame_without_prefix() {
    let bare = DEVICE_FRAME.trim_start_matches("PROTO:");
    assert_eq!(decode_text(bare).unwrap(), decode_text(DEVICE_FRAME).unwrap());
}

#[test]
fn decode_is_deterministic() {
    let a = decode(Payload::from(DEVICE_FRAME)).unwrap();
    let b = decode(Payload::from(DEVICE_FRAME)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn malformed_transport() {
    assert!(decode_text("PROTO:###").unwrap_err().is_malformed_transport());
    assert!(decode_text("{not json").unwrap_err().is_malformed_transport());
}

#[test]
fn json_text_passes_through_as_fields() {
    let decoded = decode(Payload::from("{\"foo\":1}")).unwrap();
    let msg = decoded.into_message().unwrap();
    assert_eq!(msg.get("foo"), Some(&FieldValue::Int(1)));
    assert_eq!(msg.kind, MessageKind::Generic);
}

#[test]
fn structured_value_is_untouched() {
    let value = json!({"type": "radio-batch", "signals": []});
    assert_eq!(
        decode(Payload::from(value.clone())).unwrap(),
        Decoded::PassThrough(value)
    );
}

#[test]
fn status_mode_is_monotonic() {
    let frame = FrameEncoder::new()
        .varint(2, 9)
        .bool(8, true)
        .varint(2, 55)
        .varint(4, 1)
        .text(5, "late")
        .finish();
    let msg = decode_frame(&frame).unwrap();
    assert_eq!(msg.kind, MessageKind::Status);
    // The first field 2 was read before status mode began.
    assert_eq!(msg.get("module"), Some(&FieldValue::Int(9)));
    assert_eq!(msg.get("battery_percent"), Some(&FieldValue::Int(55)));
    assert_eq!(msg.get("cc1101_2_connected"), Some(&FieldValue::Bool(true)));
    assert_eq!(msg.get("f5_str"), Some(&FieldValue::Text("late".to_string())));
    assert!(msg.get("rssi").is_none());
    assert!(msg.get("payload").is_none());
}

#[test]
fn scanning_flag_ambiguity_is_kept() {
    // A radio counter of 1 in field 1 reads as `is_scanning` and turns the
    // whole frame into a status message. Known limitation shared with the
    // device firmware.
    let frame = FrameEncoder::new().varint(1, 1).varint(2, 3).sint(4, -50).finish();
    let msg = decode_frame(&frame).unwrap();
    assert_eq!(msg.kind, MessageKind::Status);
    assert_eq!(msg.get("is_scanning"), Some(&FieldValue::Bool(true)));
    assert_eq!(msg.get("battery_percent"), Some(&FieldValue::Int(3)));
    assert_eq!(msg.get("cc1101_2_connected"), Some(&FieldValue::Bool(true)));
}

#[test]
fn unknown_fields_are_kept() {
    let frame = FrameEncoder::new()
        .varint(2, 1)
        .varint(21, 7)
        .fixed32(22, 0.5)
        .text(23, "fw-2.1")
        .raw(&[0xA1, 0x01])
        .varint(2, 2)
        .finish();
    let msg = decode_frame(&frame).unwrap();
    assert_eq!(msg.kind, MessageKind::Generic);
    assert_eq!(msg.get("f21"), Some(&FieldValue::Int(7)));
    assert_eq!(msg.get("f22_32"), Some(&FieldValue::Float(0.5)));
    assert_eq!(msg.get("f23_str"), Some(&FieldValue::Text("fw-2.1".to_string())));
    // Field 20 with wire type 1 stops the stream before the second module.
    assert_eq!(msg.stop, Some(StreamStop::UnknownWireType(1)));
    assert_eq!(msg.get("module"), Some(&FieldValue::Int(1)));
}
