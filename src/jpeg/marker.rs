// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! JPEG marker parsing and iteration.
//!
//! Walks the marker segments of a JPEG byte stream, extracting the headers
//! the codec needs (DQT, DHT, SOF0, DRI, SOS) and carrying unknown
//! segments verbatim. The walk stops at SOS and returns the byte offset
//! where entropy-coded scan data begins. Non-baseline frames are rejected
//! up front.

use super::error::{JpegError, Result};

/// JPEG marker constants.
pub const SOI: u8 = 0xD8;
pub const EOI: u8 = 0xD9;
pub const SOF0: u8 = 0xC0;
pub const DHT: u8 = 0xC4;
pub const DAC: u8 = 0xCC;
pub const DQT: u8 = 0xDB;
pub const DRI: u8 = 0xDD;
pub const SOS: u8 = 0xDA;
pub const COM: u8 = 0xFE;

/// A raw marker segment carrying the original bytes.
#[derive(Debug, Clone)]
pub struct MarkerSegment {
    /// The marker byte (e.g., 0xDB for DQT), without the 0xFF prefix.
    pub marker: u8,
    /// Segment payload, excluding the 2-byte length field.
    pub data: Vec<u8>,
}

/// Parsed marker with its position in the input.
pub struct MarkerEntry {
    pub marker: u8,
    /// Segment payload (empty for standalone markers like SOI or RST).
    pub data: Vec<u8>,
    /// Byte offset of the 0xFF prefix in the input.
    pub offset: usize,
}

/// Walk the markers of a baseline JPEG stream.
///
/// Returns the entries in order and the offset of the first entropy-coded
/// byte (right after the SOS header). Fails on any frame mode other than
/// baseline sequential.
pub fn iterate_markers(data: &[u8]) -> Result<(Vec<MarkerEntry>, usize)> {
    if data.len() < 2 || data[0] != 0xFF || data[1] != SOI {
        return Err(JpegError::InvalidSoi);
    }
    let mut entries = vec![MarkerEntry {
        marker: SOI,
        data: Vec::new(),
        offset: 0,
    }];
    let mut pos = 2;

    loop {
        if pos >= data.len() {
            return Err(JpegError::UnexpectedEof);
        }
        if data[pos] != 0xFF {
            return Err(JpegError::InvalidMarker {
                marker: data[pos],
                offset: pos,
            });
        }

        // Skip fill 0xFF bytes.
        while pos + 1 < data.len() && data[pos + 1] == 0xFF {
            pos += 1;
        }
        if pos + 1 >= data.len() {
            return Err(JpegError::UnexpectedEof);
        }

        let marker_offset = pos;
        let marker = data[pos + 1];
        pos += 2;

        // 0xFF00 is only meaningful inside entropy-coded data.
        if marker == 0x00 {
            return Err(JpegError::InvalidMarker {
                marker,
                offset: marker_offset,
            });
        }

        // Standalone markers carry no length field.
        if marker == EOI || (0xD0..=0xD7).contains(&marker) {
            entries.push(MarkerEntry {
                marker,
                data: Vec::new(),
                offset: marker_offset,
            });
            if marker == EOI {
                return Ok((entries, pos));
            }
            continue;
        }

        reject_unsupported(marker)?;

        if pos + 2 > data.len() {
            return Err(JpegError::UnexpectedEof);
        }
        let length = u16::from_be_bytes([data[pos], data[pos + 1]]) as usize;
        if length < 2 || pos + length > data.len() {
            return Err(JpegError::InvalidSegmentLength { offset: marker_offset });
        }
        let segment_data = data[pos + 2..pos + length].to_vec();

        entries.push(MarkerEntry {
            marker,
            data: segment_data,
            offset: marker_offset,
        });

        pos += length;

        // Entropy-coded data follows the SOS header.
        if marker == SOS {
            return Ok((entries, pos));
        }
    }
}

/// Reject frame modes the codec does not handle.
///
/// SOF9–SOF11 and SOF13–SOF15 are arithmetic-coded and reported as such;
/// every other non-SOF0 frame marker is an unsupported mode.
fn reject_unsupported(marker: u8) -> Result<()> {
    match marker {
        0xC9..=0xCB | 0xCD..=0xCF => Err(JpegError::UnsupportedArithmeticCoding),
        DAC => Err(JpegError::UnsupportedArithmeticCoding),
        0xC1..=0xC3 | 0xC5..=0xC8 => Err(JpegError::UnsupportedMode(marker)),
        _ => Ok(()),
    }
}

/// Parse an SOS (Start of Scan) header body.
///
/// Returns (component_id, dc_table_id, ac_table_id) per scan component.
pub fn parse_sos(data: &[u8]) -> Result<Vec<(u8, u8, u8)>> {
    if data.is_empty() {
        return Err(JpegError::InvalidMarkerData("empty SOS"));
    }
    let num_components = data[0] as usize;
    if data.len() < 1 + num_components * 2 + 3 {
        return Err(JpegError::UnexpectedEof);
    }

    let mut selectors = Vec::with_capacity(num_components);
    for i in 0..num_components {
        let offset = 1 + i * 2;
        let comp_id = data[offset];
        let td_ta = data[offset + 1];
        selectors.push((comp_id, td_ta >> 4, td_ta & 0x0F));
    }

    Ok(selectors)
}

/// Parse DRI (Define Restart Interval) data.
pub fn parse_dri(data: &[u8]) -> Result<u16> {
    if data.len() < 2 {
        return Err(JpegError::UnexpectedEof);
    }
    Ok(u16::from_be_bytes([data[0], data[1]]))
}
