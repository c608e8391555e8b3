// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Forward-only tag stream reader.

use sharkos_core::StreamStop;

use crate::wire::{TagValue, WireType, WireValue};

/// Iterates the `(tag, value)` records of a frame body.
///
/// Iteration ends at the end of the buffer, or early when a record is
/// truncated or uses an unsupported wire type. In the latter cases
/// [`TagReader::stop`] reports why; records already yielded stay valid.
#[derive(Debug, Clone)]
pub struct TagReader<'a> {
    buf: &'a [u8],
    pos: usize,
    stop: Option<StreamStop>,
}

impl<'a> TagReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            stop: None,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn stop(&self) -> Option<StreamStop> {
        self.stop
    }

    /// 7 bits per byte, low group first, into a wrapping 32-bit accumulator.
    fn read_varint(&mut self) -> Option<u32> {
        let mut acc: u32 = 0;
        let mut shift: u32 = 0;
        loop {
            let byte = *self.buf.get(self.pos)?;
            self.pos += 1;
            acc |= u32::from(byte & 0x7F).wrapping_shl(shift);
            if byte & 0x80 == 0 {
                return Some(acc);
            }
            shift = shift.wrapping_add(7);
        }
    }

    fn read_fixed32(&mut self) -> Option<f32> {
        let end = self.pos.checked_add(4)?;
        let raw: [u8; 4] = self.buf.get(self.pos..end)?.try_into().ok()?;
        self.pos = end;
        Some(f32::from_le_bytes(raw))
    }

    fn read_bytes(&mut self) -> Option<&'a [u8]> {
        let len = self.read_varint()? as usize;
        let end = self.pos.checked_add(len)?;
        let slice = self.buf.get(self.pos..end)?;
        self.pos = end;
        Some(slice)
    }

    fn halt(&mut self, reason: StreamStop) -> Option<TagValue<'a>> {
        self.stop = Some(reason);
        None
    }
}

impl<'a> Iterator for TagReader<'a> {
    type Item = TagValue<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.stop.is_some() || self.pos >= self.buf.len() {
            return None;
        }
        let Some(tag) = self.read_varint() else {
            return self.halt(StreamStop::Truncated);
        };
        let field = tag >> 3;
        let bits = (tag & 0x7) as u8;
        let value = match WireType::from_bits(bits) {
            Some(WireType::Varint) => self.read_varint().map(WireValue::Varint),
            Some(WireType::Fixed32) => self.read_fixed32().map(WireValue::Fixed32),
            Some(WireType::LengthDelimited) => self.read_bytes().map(WireValue::Bytes),
            None => return self.halt(StreamStop::UnknownWireType(bits)),
        };
        match value {
            Some(value) => Some(TagValue { field, value }),
            None => self.halt(StreamStop::Truncated),
        }
    }
}
