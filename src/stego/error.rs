// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the embedding pipeline.
//!
//! [`StegoError`] covers every failure mode from JPEG parsing through
//! payload transform and frame extraction. Nothing is swallowed: each
//! variant carries enough context (sizes, indices) to diagnose the input.

use core::fmt;

use crate::jpeg::error::JpegError;

/// Errors from steganographic embedding or extraction.
#[derive(Debug)]
pub enum StegoError {
    /// The cover or stego image could not be parsed as baseline JPEG.
    InvalidJpeg(JpegError),
    /// The configuration is rejected (delta/pair count out of range).
    InvalidConfig(&'static str),
    /// The configured target component ID does not exist in the scan.
    MissingComponent(u8),
    /// Frame (payload + length header) exceeds the cover's capacity.
    PayloadTooLarge { needed: usize, capacity: usize },
    /// Clamp-margin skips consumed the capacity slack mid-embed.
    ClampingExhausted { embedded_bits: usize },
    /// The coefficient plane ran out before the declared payload length
    /// was read.
    PayloadTruncated,
    /// The extracted length prefix exceeds the plane's capacity.
    InvalidLength { declared: u32, capacity: usize },
    /// AEAD open failed: wrong passphrase or tampered ciphertext.
    AuthenticationFailed,
    /// The sealed blob is too short to contain salt, nonce, and tag.
    MalformedCiphertext,
    /// The operation was cancelled through its token.
    Cancelled,
}

impl fmt::Display for StegoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidJpeg(e) => write!(f, "invalid JPEG: {e}"),
            Self::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            Self::MissingComponent(id) => {
                write!(f, "target component {id} not present in scan")
            }
            Self::PayloadTooLarge { needed, capacity } => {
                write!(f, "payload too large: {needed} bytes framed, capacity {capacity}")
            }
            Self::ClampingExhausted { embedded_bits } => {
                write!(f, "clamping skips exhausted capacity after {embedded_bits} bits")
            }
            Self::PayloadTruncated => write!(f, "coefficient plane exhausted mid-payload"),
            Self::InvalidLength { declared, capacity } => {
                write!(f, "declared payload length {declared} exceeds capacity {capacity}")
            }
            Self::AuthenticationFailed => {
                write!(f, "decryption failed (wrong passphrase or tampered data)")
            }
            Self::MalformedCiphertext => write!(f, "sealed payload is malformed"),
            Self::Cancelled => write!(f, "operation cancelled"),
        }
    }
}

impl std::error::Error for StegoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidJpeg(e) => Some(e),
            _ => None,
        }
    }
}

impl From<JpegError> for StegoError {
    fn from(e: JpegError) -> Self {
        Self::InvalidJpeg(e)
    }
}
