// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Optional `0xAA 0x55 <len:u16 LE>` frame preamble.

use tracing::trace;

pub const FRAME_MAGIC: [u8; 2] = [0xAA, 0x55];
pub const FRAME_HEADER_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Body length as announced by the device. Not validated.
    pub declared_len: u16,
}

pub fn parse_header(bytes: &[u8]) -> Option<FrameHeader> {
    if bytes.len() < FRAME_HEADER_LEN || bytes[..2] != FRAME_MAGIC {
        return None;
    }
    Some(FrameHeader {
        declared_len: u16::from_le_bytes([bytes[2], bytes[3]]),
    })
}

/// Return the tag stream of a frame, skipping the preamble when present.
pub fn frame_body(bytes: &[u8]) -> &[u8] {
    match parse_header(bytes) {
        Some(header) => {
            let body = &bytes[FRAME_HEADER_LEN..];
            if usize::from(header.declared_len) != body.len() {
                trace!(
                    "frame header announces {} bytes, body has {}",
                    header.declared_len,
                    body.len()
                );
            }
            body
        }
        None => bytes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_is_skipped() {
        let bytes = [0xAA, 0x55, 0x02, 0x00, 0x08, 0x01];
        assert_eq!(
            parse_header(&bytes),
            Some(FrameHeader { declared_len: 2 })
        );
        assert_eq!(frame_body(&bytes), &[0x08, 0x01]);
    }

    #[test]
    fn test_length_is_not_validated() {
        let bytes = [0xAA, 0x55, 0xFF, 0xFF, 0x08];
        assert_eq!(frame_body(&bytes), &[0x08]);
    }

    #[test]
    fn test_short_or_unmarked_frames_pass_through() {
        assert_eq!(frame_body(&[0xAA, 0x55, 0x00]), &[0xAA, 0x55, 0x00]);
        assert_eq!(frame_body(&[0x55, 0xAA, 0x00, 0x00]), &[0x55, 0xAA, 0x00, 0x00]);
        assert_eq!(frame_body(&[]), &[] as &[u8]);
    }

    #[test]
    fn test_header_only_frame_has_empty_body() {
        assert!(frame_body(&[0xAA, 0x55, 0x00, 0x00]).is_empty());
    }
}
