// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Payload framing.
//!
//! The frame is the bit stream handed to the modulation engine:
//!
//! ```text
//! [4 bytes] payload length (big-endian u32)
//! [N bytes] payload (transform output, treated as opaque)
//! ```
//!
//! Bits are consumed MSB-first within each byte. Integrity and
//! authenticity are the transform's concern (the AEAD tag inside the
//! sealed blob); the frame itself is the bare length prefix.

/// Length header size in bytes.
pub const FRAME_HEADER_LEN: usize = 4;

/// Prefix a payload with its big-endian u32 length.
pub fn build_frame(payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(FRAME_HEADER_LEN + payload.len());
    frame.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    frame.extend_from_slice(payload);
    frame
}

/// Expand bytes to bits, MSB first within each byte.
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for &byte in bytes {
        for bit_pos in (0..8).rev() {
            bits.push((byte >> bit_pos) & 1);
        }
    }
    bits
}

/// Pack bits (MSB first) back into bytes; a trailing partial byte is
/// zero-padded.
pub fn bits_to_bytes(bits: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(bits.len().div_ceil(8));
    for chunk in bits.chunks(8) {
        let mut byte = 0u8;
        for (i, &bit) in chunk.iter().enumerate() {
            byte |= (bit & 1) << (7 - i);
        }
        bytes.push(byte);
    }
    bytes
}
