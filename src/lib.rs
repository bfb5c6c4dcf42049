// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! # dctdm-core
//!
//! Pure-Rust steganography engine that hides byte payloads in baseline
//! JPEG photos by DCT Difference Modulation (DCTDM): payload bits are
//! modulated into the differences of luminance AC coefficient pairs, two
//! bits per pair.
//!
//! The hard part is the JPEG codec (`jpeg` module): off-the-shelf
//! libraries requantize on save and destroy the low-order coefficient
//! bits that carry the payload, so this crate parses, entropy-decodes,
//! and re-encodes baseline JPEG itself, preserving every DCT coefficient
//! exactly. The codec is zero-dependency (std only); the steganography
//! layer (`stego` module) adds optional AES-256-GCM-SIV encryption with
//! PBKDF2-HMAC-SHA256 key derivation.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use dctdm_core::{dctdm_embed, dctdm_extract, DctdmConfig, Transform};
//!
//! let cover = std::fs::read("photo.jpg").unwrap();
//! let config = DctdmConfig::default();
//! let stego = dctdm_embed(&cover, b"meet at dawn", &config, &Transform::Identity).unwrap();
//! let payload = dctdm_extract(&stego, &config, &Transform::Identity).unwrap();
//! assert_eq!(payload, b"meet at dawn");
//! ```

pub mod jpeg;
pub mod stego;

pub use jpeg::coeff::{CoeffGrid, QuantTable};
pub use jpeg::error::{JpegError, Result as JpegResult};
pub use jpeg::frame::FrameInfo;
pub use jpeg::JpegImage;
pub use stego::{
    dctdm_capacity, dctdm_embed, dctdm_embed_with_cancel, dctdm_extract,
    dctdm_extract_with_cancel, CancelToken, DctdmConfig, StegoError, Transform,
};
