// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Decoder for SharkOS telemetry frames.
//!
//! The device sends status reports and radio-signal samples over one BLE
//! notification channel, either as JSON text or as a varint-tagged binary
//! frame wrapped in base64. Decoding is pure and synchronous: every call
//! works on its own input and local state only.

pub mod codec;
pub mod encode;
pub mod error;
pub mod frame;
pub mod reader;
pub mod resolver;
pub mod transport;
pub mod wire;

// Re-export commonly used items
pub use codec::{decode, decode_frame, decode_text, Decoded, Payload};
pub use encode::FrameEncoder;
pub use error::{DecodeError, TransportError};
pub use sharkos_core::{DecodedMessage, FieldValue, Fields, MessageKind, StreamStop};
