// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Payload classification and transport unwrapping.
//!
//! Notifications arrive either as a JSON object or as a base64 encoded
//! binary frame, optionally prefixed with `PROTO:`.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{Map, Value};

use crate::error::TransportError;

/// Literal prefix the firmware puts in front of encoded frames.
pub const PROTO_PREFIX: &str = "PROTO:";

/// How a text payload should be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadClass<'a> {
    /// JSON object text.
    Json(&'a str),
    /// Base64 text with any `PROTO:` prefix already removed.
    Encoded(&'a str),
}

/// Classify a text payload. Surrounding whitespace is ignored.
pub fn classify(text: &str) -> PayloadClass<'_> {
    let text = text.trim();
    if text.starts_with('{') {
        PayloadClass::Json(text)
    } else {
        PayloadClass::Encoded(text.strip_prefix(PROTO_PREFIX).unwrap_or(text))
    }
}

/// Reverse the standard (padded) base64 encoding of a frame.
pub fn unwrap_base64(encoded: &str) -> Result<Vec<u8>, TransportError> {
    Ok(STANDARD.decode(encoded)?)
}

/// Parse JSON object text.
pub fn parse_json_object(text: &str) -> Result<Map<String, Value>, TransportError> {
    Ok(serde_json::from_str(text)?)
}
