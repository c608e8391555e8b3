// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

use thiserror::Error;

/// The outer envelope could not be unwrapped.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reasons a payload produced no message.
///
/// A frame that stops early (truncated value, unknown wire type) is not an
/// error; see [`sharkos_core::DecodedMessage::stop`].
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed transport: {0}")]
    MalformedTransport(#[from] TransportError),

    #[error("payload carried no recognizable fields")]
    EmptyResult,
}

impl DecodeError {
    pub fn is_malformed_transport(&self) -> bool {
        matches!(self, DecodeError::MalformedTransport(_))
    }

    pub fn is_empty_result(&self) -> bool {
        matches!(self, DecodeError::EmptyResult)
    }
}
