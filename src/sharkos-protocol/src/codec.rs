// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Decoder entry points and result assembly.

use serde_json::Value;
use tracing::debug;

use sharkos_core::status::is_status_field;
use sharkos_core::{DecodedMessage, FieldValue, Fields, MessageKind};

use crate::error::DecodeError;
use crate::frame::frame_body;
use crate::reader::TagReader;
use crate::resolver::{resolve, ClassState};
use crate::transport::{classify, parse_json_object, unwrap_base64, PayloadClass};

/// Field names that mark a radio-signal sample.
pub const RADIO_SIGNAL_FIELDS: [&str; 4] = ["frequency_mhz", "rssi", "payload", "extra"];

/// Raw value handed over by the transport layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Already-parsed data from a higher-level envelope.
    Structured(Value),
    /// JSON text or an encoded binary frame.
    Text(String),
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Payload::Text(value)
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Payload::Text(value.to_string())
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Structured(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// Structured input, returned untouched.
    PassThrough(Value),
    Message(DecodedMessage),
}

impl Decoded {
    pub fn message(&self) -> Option<&DecodedMessage> {
        match self {
            Decoded::Message(msg) => Some(msg),
            Decoded::PassThrough(_) => None,
        }
    }

    pub fn into_message(self) -> Option<DecodedMessage> {
        match self {
            Decoded::Message(msg) => Some(msg),
            Decoded::PassThrough(_) => None,
        }
    }
}

/// Decode one transport payload.
pub fn decode(payload: Payload) -> Result<Decoded, DecodeError> {
    match payload {
        Payload::Structured(value) => Ok(Decoded::PassThrough(value)),
        Payload::Text(text) => decode_text(&text).map(Decoded::Message),
    }
}

/// Decode JSON object text or a (`PROTO:`-prefixed) base64 frame.
pub fn decode_text(text: &str) -> Result<DecodedMessage, DecodeError> {
    match classify(text) {
        PayloadClass::Json(json) => decode_json(json),
        PayloadClass::Encoded(encoded) => {
            let bytes = unwrap_base64(encoded)?;
            decode_frame(&bytes)
        }
    }
}

/// Decode an unwrapped binary frame, with or without its preamble.
pub fn decode_frame(bytes: &[u8]) -> Result<DecodedMessage, DecodeError> {
    let body = frame_body(bytes);
    let mut state = ClassState::default();
    let mut fields = Fields::new();
    let mut reader = TagReader::new(body);

    for tag in reader.by_ref() {
        let (name, value) = resolve(tag, &mut state);
        fields.insert(name, value);
    }

    let stop = reader.stop();
    if let Some(stop) = stop {
        debug!(
            "frame stopped at byte {} of {} ({:?}), kept {} fields",
            reader.position(),
            body.len(),
            stop,
            fields.len()
        );
    }

    if fields.is_empty() {
        return Err(DecodeError::EmptyResult);
    }

    let kind = if state.is_status() {
        MessageKind::Status
    } else {
        classify_fields(&fields)
    };

    Ok(DecodedMessage { kind, fields, stop })
}

fn decode_json(text: &str) -> Result<DecodedMessage, DecodeError> {
    let object = parse_json_object(text)?;
    let fields: Fields = object
        .iter()
        .map(|(k, v)| (k.clone(), FieldValue::from_json(v)))
        .collect();
    if fields.is_empty() {
        return Err(DecodeError::EmptyResult);
    }

    let kind = if fields.keys().any(|k| is_status_field(k)) {
        MessageKind::Status
    } else {
        classify_fields(&fields)
    };
    Ok(DecodedMessage::new(kind, fields))
}

fn classify_fields(fields: &Fields) -> MessageKind {
    if RADIO_SIGNAL_FIELDS.iter().any(|k| fields.contains_key(*k)) {
        MessageKind::RadioSignal
    } else {
        MessageKind::Generic
    }
}
