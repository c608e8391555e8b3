// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Frame builder producing the same encoding the device firmware emits.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::frame::FRAME_MAGIC;
use crate::transport::PROTO_PREFIX;
use crate::wire::{make_tag, zigzag_encode, WireType};

pub fn write_varint(buf: &mut Vec<u8>, mut value: u32) {
    while value >= 0x80 {
        buf.push((value as u8 & 0x7F) | 0x80);
        value >>= 7;
    }
    buf.push(value as u8);
}

#[derive(Debug, Clone, Default)]
pub struct FrameEncoder {
    body: Vec<u8>,
    header: bool,
}

impl FrameEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix the frame with the `0xAA 0x55 <len>` preamble.
    pub fn with_header(mut self) -> Self {
        self.header = true;
        self
    }

    fn tag(&mut self, field: u32, wire_type: WireType) {
        write_varint(&mut self.body, make_tag(field, wire_type));
    }

    pub fn varint(mut self, field: u32, value: u32) -> Self {
        self.tag(field, WireType::Varint);
        write_varint(&mut self.body, value);
        self
    }

    pub fn bool(self, field: u32, value: bool) -> Self {
        self.varint(field, u32::from(value))
    }

    /// Signed value, ZigZag encoded.
    pub fn sint(self, field: u32, value: i32) -> Self {
        self.varint(field, zigzag_encode(value))
    }

    pub fn fixed32(mut self, field: u32, value: f32) -> Self {
        self.tag(field, WireType::Fixed32);
        self.body.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn bytes(mut self, field: u32, value: &[u8]) -> Self {
        self.tag(field, WireType::LengthDelimited);
        write_varint(&mut self.body, value.len() as u32);
        self.body.extend_from_slice(value);
        self
    }

    pub fn text(self, field: u32, value: &str) -> Self {
        self.bytes(field, value.as_bytes())
    }

    /// Append bytes verbatim, e.g. a record with an unsupported wire type.
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(bytes);
        self
    }

    /// Serialize the frame.
    ///
    /// The header length field is a `u16`; bodies longer than 65535 bytes
    /// get `0xFFFF`. Decoding never reads that field, so such a frame still
    /// decodes, but its header no longer states the true body length.
    pub fn finish(&self) -> Vec<u8> {
        let mut frame = Vec::with_capacity(self.body.len() + 4);
        if self.header {
            let len = u16::try_from(self.body.len()).unwrap_or(u16::MAX);
            frame.extend_from_slice(&FRAME_MAGIC);
            frame.extend_from_slice(&len.to_le_bytes());
        }
        frame.extend_from_slice(&self.body);
        frame
    }

    /// `PROTO:` + base64, as sent over the notification channel.
    pub fn to_transport(&self) -> String {
        format!("{}{}", PROTO_PREFIX, STANDARD.encode(self.finish()))
    }
}
