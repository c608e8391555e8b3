// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Tag/value units of the varint-tagged wire encoding.

/// Supported wire types (low three bits of a tag).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    Varint,
    Fixed32,
    LengthDelimited,
}

impl WireType {
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(WireType::Varint),
            2 => Some(WireType::LengthDelimited),
            5 => Some(WireType::Fixed32),
            _ => None,
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            WireType::Varint => 0,
            WireType::LengthDelimited => 2,
            WireType::Fixed32 => 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WireValue<'a> {
    /// Varints accumulate into 32 bits; longer encodings wrap.
    Varint(u32),
    Fixed32(f32),
    Bytes(&'a [u8]),
}

/// One parsed record, borrowed from the frame it was read from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TagValue<'a> {
    pub field: u32,
    pub value: WireValue<'a>,
}

impl TagValue<'_> {
    pub fn wire_type(&self) -> WireType {
        match self.value {
            WireValue::Varint(_) => WireType::Varint,
            WireValue::Fixed32(_) => WireType::Fixed32,
            WireValue::Bytes(_) => WireType::LengthDelimited,
        }
    }
}

pub fn make_tag(field: u32, wire_type: WireType) -> u32 {
    (field << 3) | u32::from(wire_type.bits())
}

pub fn zigzag_encode(value: i32) -> u32 {
    ((value << 1) ^ (value >> 31)) as u32
}

pub fn zigzag_decode(value: u32) -> i32 {
    ((value >> 1) as i32) ^ -((value & 1) as i32)
}
