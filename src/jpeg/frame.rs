// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! JPEG frame header (SOF0) parsing.
//!
//! Extracts image dimensions, component descriptors, and sampling factors
//! from the Start of Frame segment, and derives the MCU layout.

use super::error::{JpegError, Result};

/// One image component from SOF0.
#[derive(Debug, Clone)]
pub struct Component {
    /// Component ID (typically 1=Y, 2=Cb, 3=Cr).
    pub id: u8,
    /// Horizontal sampling factor (1–4).
    pub h_sampling: u8,
    /// Vertical sampling factor (1–4).
    pub v_sampling: u8,
    /// Quantization table ID (0–3).
    pub quant_table_id: u8,
}

/// Frame information parsed from a SOF0 segment.
#[derive(Debug, Clone)]
pub struct FrameInfo {
    /// Sample precision in bits (always 8).
    pub precision: u8,
    /// Image height in pixels.
    pub height: u16,
    /// Image width in pixels.
    pub width: u16,
    /// Components in frame order.
    pub components: Vec<Component>,
    /// Maximum horizontal sampling factor across components.
    pub max_h_sampling: u8,
    /// Maximum vertical sampling factor across components.
    pub max_v_sampling: u8,
    /// Number of MCUs horizontally.
    pub mcus_wide: u16,
    /// Number of MCUs vertically.
    pub mcus_tall: u16,
}

impl FrameInfo {
    /// Number of 8×8 blocks per row for a given component.
    pub fn blocks_wide(&self, comp_idx: usize) -> usize {
        self.mcus_wide as usize * self.components[comp_idx].h_sampling as usize
    }

    /// Number of 8×8 block rows for a given component.
    pub fn blocks_tall(&self, comp_idx: usize) -> usize {
        self.mcus_tall as usize * self.components[comp_idx].v_sampling as usize
    }
}

fn parse_component(chunk: &[u8]) -> Result<Component> {
    let [id, sampling, quant_table_id] = *chunk else {
        return Err(JpegError::UnexpectedEof);
    };
    let h_sampling = sampling >> 4;
    let v_sampling = sampling & 0x0F;

    if !(1..=4).contains(&h_sampling) || !(1..=4).contains(&v_sampling) {
        return Err(JpegError::InvalidDimensions);
    }
    if quant_table_id > 3 {
        return Err(JpegError::InvalidQuantTableId(quant_table_id));
    }

    Ok(Component {
        id,
        h_sampling,
        v_sampling,
        quant_table_id,
    })
}

/// Parse a SOF0 segment body (after the 2-byte length field).
pub fn parse_sof(data: &[u8]) -> Result<FrameInfo> {
    let [precision, h_hi, h_lo, w_hi, w_lo, num_components, components @ ..] = data else {
        return Err(JpegError::UnexpectedEof);
    };

    if *precision != 8 {
        return Err(JpegError::UnsupportedPrecision(*precision));
    }

    let height = u16::from_be_bytes([*h_hi, *h_lo]);
    let width = u16::from_be_bytes([*w_hi, *w_lo]);
    if width == 0 || height == 0 {
        return Err(JpegError::InvalidDimensions);
    }

    let num_components = usize::from(*num_components);
    if components.len() < num_components * 3 {
        return Err(JpegError::UnexpectedEof);
    }

    let components: Vec<Component> = components[..num_components * 3]
        .chunks_exact(3)
        .map(parse_component)
        .collect::<Result<_>>()?;

    let max_h = components.iter().map(|c| c.h_sampling).max().unwrap_or(1);
    let max_v = components.iter().map(|c| c.v_sampling).max().unwrap_or(1);
    let mcus_wide = width.div_ceil(u16::from(max_h) * 8);
    let mcus_tall = height.div_ceil(u16::from(max_v) * 8);

    Ok(FrameInfo {
        precision: *precision,
        height,
        width,
        components,
        max_h_sampling: max_h,
        max_v_sampling: max_v,
        mcus_wide,
        mcus_tall,
    })
}
