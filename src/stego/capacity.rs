// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Embedding capacity.
//!
//! With K positions per block, a plane of N blocks nominally carries
//! ⌊N·K/8⌋ frame bytes; the 4-byte length header comes out of that. With
//! `skip_zero_pairs` set, only pairs with at least one nonzero coefficient
//! count. Clamp-margin skips are deliberately NOT subtracted: they are an
//! edge condition of extreme coefficients and surface as
//! `ClampingExhausted` during embedding instead.

use crate::jpeg::coeff::CoeffGrid;

use super::config::DctdmConfig;
use super::framing::FRAME_HEADER_LEN;

/// Frame capacity of a plane in bits.
pub fn frame_capacity_bits(grid: &CoeffGrid, cfg: &DctdmConfig) -> usize {
    if !cfg.skip_zero_pairs {
        return grid.total_blocks() * cfg.bits_per_block();
    }

    let mut usable_pairs = 0usize;
    for bi in 0..grid.total_blocks() {
        let block = grid.block_at(bi);
        for pair in 0..cfg.pairs() {
            let z1 = 1 + 2 * pair;
            if block[z1] != 0 || block[z1 + 1] != 0 {
                usable_pairs += 1;
            }
        }
    }
    usable_pairs * 2
}

/// Frame capacity of a plane in whole bytes.
pub fn frame_capacity_bytes(grid: &CoeffGrid, cfg: &DctdmConfig) -> usize {
    frame_capacity_bits(grid, cfg) / 8
}

/// Maximum payload size in bytes (frame capacity minus the length header).
pub fn payload_capacity_bytes(grid: &CoeffGrid, cfg: &DctdmConfig) -> usize {
    frame_capacity_bytes(grid, cfg).saturating_sub(FRAME_HEADER_LEN)
}
