// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Error types for JPEG parsing and encoding.

use std::fmt;

/// Errors that can occur during JPEG parsing or encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JpegError {
    /// Input data is too short or truncated mid-symbol.
    UnexpectedEof,
    /// Missing SOI (0xFFD8) at start of data.
    InvalidSoi,
    /// A byte that should introduce a marker does not.
    InvalidMarker { marker: u8, offset: usize },
    /// A marker segment declares a length that does not fit the data.
    InvalidSegmentLength { offset: usize },
    /// The entropy stream contains a bit pattern with no assigned Huffman code.
    InvalidHuffmanCode,
    /// A restart marker was due after DRI MCUs but is not present.
    MissingRestartMarker { mcu: usize },
    /// Any SOF other than baseline sequential (SOF0): progressive,
    /// hierarchical, lossless, extended sequential.
    UnsupportedMode(u8),
    /// Arithmetic entropy coding (DAC marker or arithmetic SOF).
    UnsupportedArithmeticCoding,
    /// Sample precision other than 8-bit.
    UnsupportedPrecision(u8),
    /// A marker segment has invalid or inconsistent content.
    InvalidMarkerData(&'static str),
    /// Quantization table ID out of range (0–3).
    InvalidQuantTableId(u8),
    /// Huffman table ID out of range or missing.
    InvalidHuffmanTableId(u8),
    /// Component ID referenced in SOS not found in SOF.
    UnknownComponentId(u8),
    /// Image dimensions or sampling factors are invalid.
    InvalidDimensions,
}

impl fmt::Display for JpegError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof => write!(f, "unexpected end of JPEG data"),
            Self::InvalidSoi => write!(f, "missing SOI marker (not a JPEG)"),
            Self::InvalidMarker { marker, offset } => {
                write!(f, "invalid marker byte 0x{marker:02X} at offset {offset}")
            }
            Self::InvalidSegmentLength { offset } => {
                write!(f, "invalid segment length at offset {offset}")
            }
            Self::InvalidHuffmanCode => write!(f, "invalid Huffman code in entropy data"),
            Self::MissingRestartMarker { mcu } => {
                write!(f, "missing restart marker before MCU {mcu}")
            }
            Self::UnsupportedMode(m) => {
                write!(f, "unsupported JPEG mode (marker 0xFF{m:02X}); baseline SOF0 only")
            }
            Self::UnsupportedArithmeticCoding => {
                write!(f, "arithmetic entropy coding is not supported")
            }
            Self::UnsupportedPrecision(p) => {
                write!(f, "unsupported sample precision: {p}-bit")
            }
            Self::InvalidMarkerData(msg) => write!(f, "invalid marker data: {msg}"),
            Self::InvalidQuantTableId(id) => write!(f, "invalid quantization table ID: {id}"),
            Self::InvalidHuffmanTableId(id) => write!(f, "invalid Huffman table ID: {id}"),
            Self::UnknownComponentId(id) => write!(f, "unknown component ID in SOS: {id}"),
            Self::InvalidDimensions => write!(f, "invalid image dimensions or sampling factors"),
        }
    }
}

impl std::error::Error for JpegError {}

pub type Result<T> = std::result::Result<T, JpegError>;
