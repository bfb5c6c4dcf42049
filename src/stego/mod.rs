// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! DCT Difference Modulation steganography.
//!
//! Payloads ride in the differences of fixed AC coefficient pairs of the
//! luminance plane (two bits per pair, step size δ). The payload boundary
//! is a 4-byte length prefix around the output of an optional
//! passphrase-based authenticated-encryption transform; nothing about the
//! configuration is stored in the image, so embed and extract must agree
//! on it out of band.

pub mod cancel;
pub mod capacity;
pub mod config;
pub mod crypto;
pub mod dctdm;
pub mod error;
pub mod framing;
mod pipeline;

pub use cancel::CancelToken;
pub use config::DctdmConfig;
pub use crypto::Transform;
pub use error::StegoError;
pub use pipeline::{
    dctdm_capacity, dctdm_embed, dctdm_embed_with_cancel, dctdm_extract,
    dctdm_extract_with_cancel,
};
