// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Embed/extract pipeline.
//!
//! Ties the layers together: parse the cover JPEG, locate the target
//! component's coefficient plane, seal and frame the payload, run the
//! modulation engine, and re-encode. Extraction is the mirror image.
//! On failure nothing is emitted; the caller's buffers are untouched.

use crate::jpeg::JpegImage;

use super::cancel::CancelToken;
use super::capacity::payload_capacity_bytes;
use super::config::DctdmConfig;
use super::crypto::Transform;
use super::dctdm::{embed_frame, extract_frame};
use super::error::StegoError;
use super::framing::build_frame;

/// Embed a payload into a cover JPEG, returning the stego JPEG bytes.
///
/// The payload is sealed with `transform`, framed with a 4-byte length
/// prefix, and modulated into the configured component's AC coefficient
/// pairs. The output decodes to the modified coefficient plane exactly.
///
/// # Errors
/// - [`StegoError::InvalidJpeg`] if the cover is not a valid baseline JPEG.
/// - [`StegoError::MissingComponent`] if the configured component is absent.
/// - [`StegoError::PayloadTooLarge`] if the framed payload exceeds capacity.
/// - [`StegoError::ClampingExhausted`] if clamp-margin skips ate the slack.
pub fn dctdm_embed(
    cover: &[u8],
    payload: &[u8],
    config: &DctdmConfig,
    transform: &Transform<'_>,
) -> Result<Vec<u8>, StegoError> {
    dctdm_embed_with_cancel(cover, payload, config, transform, &CancelToken::new())
}

/// [`dctdm_embed`] with a caller-supplied cancellation token.
pub fn dctdm_embed_with_cancel(
    cover: &[u8],
    payload: &[u8],
    config: &DctdmConfig,
    transform: &Transform<'_>,
    cancel: &CancelToken,
) -> Result<Vec<u8>, StegoError> {
    config.validate()?;

    let mut img = JpegImage::from_bytes(cover)?;
    let comp = img
        .component_index(config.component)
        .ok_or(StegoError::MissingComponent(config.component))?;

    let sealed = transform.seal(payload);
    let frame = build_frame(&sealed);

    embed_frame(img.coeff_grid_mut(comp), &frame, config, cancel)?;

    // Re-encode with the original Huffman tables; rebuild them only if a
    // modified coefficient produced a symbol the tables cannot express.
    match img.to_bytes() {
        Ok(bytes) => Ok(bytes),
        Err(_) => {
            img.rebuild_huffman_tables();
            img.to_bytes().map_err(StegoError::InvalidJpeg)
        }
    }
}

/// Extract a payload from a stego JPEG.
///
/// Must be called with the same configuration and transform the payload
/// was embedded with; neither is stored in the image.
///
/// # Errors
/// - [`StegoError::InvalidLength`] if the length prefix exceeds capacity.
/// - [`StegoError::PayloadTruncated`] if the plane runs out mid-payload.
/// - [`StegoError::AuthenticationFailed`] on a wrong passphrase.
pub fn dctdm_extract(
    stego: &[u8],
    config: &DctdmConfig,
    transform: &Transform<'_>,
) -> Result<Vec<u8>, StegoError> {
    dctdm_extract_with_cancel(stego, config, transform, &CancelToken::new())
}

/// [`dctdm_extract`] with a caller-supplied cancellation token.
pub fn dctdm_extract_with_cancel(
    stego: &[u8],
    config: &DctdmConfig,
    transform: &Transform<'_>,
    cancel: &CancelToken,
) -> Result<Vec<u8>, StegoError> {
    config.validate()?;

    let img = JpegImage::from_bytes(stego)?;
    let comp = img
        .component_index(config.component)
        .ok_or(StegoError::MissingComponent(config.component))?;

    let sealed = extract_frame(img.coeff_grid(comp), config, cancel)?;
    transform.open(&sealed)
}

/// Maximum payload size (in bytes, after sealing) a cover can hold under
/// the given configuration.
pub fn dctdm_capacity(cover: &[u8], config: &DctdmConfig) -> Result<usize, StegoError> {
    config.validate()?;

    let img = JpegImage::from_bytes(cover)?;
    let comp = img
        .component_index(config.component)
        .ok_or(StegoError::MissingComponent(config.component))?;

    Ok(payload_capacity_bytes(img.coeff_grid(comp), config))
}
