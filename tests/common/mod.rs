// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Shared helpers: synthetic baseline JPEG covers for integration tests.
//!
//! Builds complete byte streams (SOI/APP0/DQT/SOF0/DHT/[DRI]/SOS/entropy/
//! EOI) from the ITU-T T.81 Annex K standard luminance Huffman tables and
//! caller-supplied coefficient blocks, through the crate's own segment
//! writers and entropy encoder. All components share table set 0.

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

use dctdm_core::jpeg::coeff::{CoeffGrid, QuantTable};
use dctdm_core::jpeg::frame::{Component, FrameInfo};
use dctdm_core::jpeg::scan::{encode_scan, ScanComponent};
use dctdm_core::jpeg::tables::{write_dht, write_dqt, HuffmanSpec};

/// Standard luminance DC table (Annex K.3.1).
pub fn std_dc_spec() -> HuffmanSpec {
    HuffmanSpec {
        class: 0,
        id: 0,
        bits: [0, 1, 5, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0],
        huffval: (0..=11).collect(),
    }
}

/// Standard luminance AC table (Annex K.3.2).
pub fn std_ac_spec() -> HuffmanSpec {
    HuffmanSpec {
        class: 1,
        id: 0,
        bits: [0, 2, 1, 3, 3, 2, 4, 3, 5, 5, 4, 4, 0, 0, 1, 125],
        huffval: vec![
            0x01, 0x02, 0x03, 0x00, 0x04, 0x11, 0x05, 0x12, //
            0x21, 0x31, 0x41, 0x06, 0x13, 0x51, 0x61, 0x07, //
            0x22, 0x71, 0x14, 0x32, 0x81, 0x91, 0xA1, 0x08, //
            0x23, 0x42, 0xB1, 0xC1, 0x15, 0x52, 0xD1, 0xF0, //
            0x24, 0x33, 0x62, 0x72, 0x82, 0x09, 0x0A, 0x16, //
            0x17, 0x18, 0x19, 0x1A, 0x25, 0x26, 0x27, 0x28, //
            0x29, 0x2A, 0x34, 0x35, 0x36, 0x37, 0x38, 0x39, //
            0x3A, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48, 0x49, //
            0x4A, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58, 0x59, //
            0x5A, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68, 0x69, //
            0x6A, 0x73, 0x74, 0x75, 0x76, 0x77, 0x78, 0x79, //
            0x7A, 0x83, 0x84, 0x85, 0x86, 0x87, 0x88, 0x89, //
            0x8A, 0x92, 0x93, 0x94, 0x95, 0x96, 0x97, 0x98, //
            0x99, 0x9A, 0xA2, 0xA3, 0xA4, 0xA5, 0xA6, 0xA7, //
            0xA8, 0xA9, 0xAA, 0xB2, 0xB3, 0xB4, 0xB5, 0xB6, //
            0xB7, 0xB8, 0xB9, 0xBA, 0xC2, 0xC3, 0xC4, 0xC5, //
            0xC6, 0xC7, 0xC8, 0xC9, 0xCA, 0xD2, 0xD3, 0xD4, //
            0xD5, 0xD6, 0xD7, 0xD8, 0xD9, 0xDA, 0xE1, 0xE2, //
            0xE3, 0xE4, 0xE5, 0xE6, 0xE7, 0xE8, 0xE9, 0xEA, //
            0xF1, 0xF2, 0xF3, 0xF4, 0xF5, 0xF6, 0xF7, 0xF8, //
            0xF9, 0xFA,
        ],
    }
}

fn flat_quant_table() -> QuantTable {
    QuantTable::new([16u16; 64])
}

/// Assemble a baseline JPEG from per-component coefficient blocks.
///
/// `sampling` gives (h, v) factors per component; component IDs are
/// 1, 2, 3, … in order. `fill(comp, block_index)` supplies each block in
/// zigzag order. `dri` > 0 adds a DRI segment and restart markers.
pub fn build_jpeg(
    width: u16,
    height: u16,
    sampling: &[(u8, u8)],
    dri: u16,
    fill: &mut dyn FnMut(usize, usize) -> [i16; 64],
) -> Vec<u8> {
    let max_h = sampling.iter().map(|&(h, _)| h).max().unwrap();
    let max_v = sampling.iter().map(|&(_, v)| v).max().unwrap();
    let mcus_wide = width.div_ceil(max_h as u16 * 8);
    let mcus_tall = height.div_ceil(max_v as u16 * 8);

    let components: Vec<Component> = sampling
        .iter()
        .enumerate()
        .map(|(i, &(h, v))| Component {
            id: (i + 1) as u8,
            h_sampling: h,
            v_sampling: v,
            quant_table_id: 0,
        })
        .collect();

    let frame = FrameInfo {
        precision: 8,
        height,
        width,
        components,
        max_h_sampling: max_h,
        max_v_sampling: max_v,
        mcus_wide,
        mcus_tall,
    };

    let scan_components: Vec<ScanComponent> = (0..sampling.len())
        .map(|comp_idx| ScanComponent {
            comp_idx,
            dc_table: 0,
            ac_table: 0,
        })
        .collect();

    let mut grids = Vec::new();
    for comp_idx in 0..sampling.len() {
        let bw = frame.blocks_wide(comp_idx);
        let bt = frame.blocks_tall(comp_idx);
        let mut grid = CoeffGrid::new(bw, bt);
        for bi in 0..grid.total_blocks() {
            grid.block_at_mut(bi).copy_from_slice(&fill(comp_idx, bi));
        }
        grids.push(grid);
    }

    let dc_specs = [Some(std_dc_spec()), None, None, None];
    let ac_specs = [Some(std_ac_spec()), None, None, None];
    let scan_bytes = encode_scan(&frame, &scan_components, &grids, &dc_specs, &ac_specs, dri)
        .expect("standard tables encode every synthetic block");

    let mut out = vec![0xFF, 0xD8];

    // APP0 (JFIF 1.1, no thumbnail).
    out.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x10]);
    out.extend_from_slice(b"JFIF\0");
    out.extend_from_slice(&[0x01, 0x01, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00]);

    out.extend_from_slice(&write_dqt(0, &flat_quant_table()));

    // SOF0.
    let n = sampling.len();
    out.extend_from_slice(&[0xFF, 0xC0]);
    out.extend_from_slice(&((8 + 3 * n) as u16).to_be_bytes());
    out.push(8);
    out.extend_from_slice(&height.to_be_bytes());
    out.extend_from_slice(&width.to_be_bytes());
    out.push(n as u8);
    for (i, &(h, v)) in sampling.iter().enumerate() {
        out.push((i + 1) as u8);
        out.push((h << 4) | v);
        out.push(0);
    }

    out.extend_from_slice(&write_dht(&std_dc_spec()));
    out.extend_from_slice(&write_dht(&std_ac_spec()));

    if dri > 0 {
        out.extend_from_slice(&[0xFF, 0xDD, 0x00, 0x04]);
        out.extend_from_slice(&dri.to_be_bytes());
    }

    // SOS.
    out.extend_from_slice(&[0xFF, 0xDA]);
    out.extend_from_slice(&((6 + 2 * n) as u16).to_be_bytes());
    out.push(n as u8);
    for i in 0..n {
        out.push((i + 1) as u8);
        out.push(0x00);
    }
    out.extend_from_slice(&[0, 63, 0]);

    out.extend_from_slice(&scan_bytes);
    out.extend_from_slice(&[0xFF, 0xD9]);

    out
}

/// A solid-gray cover: constant DC, all ACs zero.
pub fn solid_gray_jpeg(width: u16, height: u16, sampling: &[(u8, u8)]) -> Vec<u8> {
    build_jpeg(width, height, sampling, 0, &mut |_, _| {
        let mut block = [0i16; 64];
        block[0] = 50;
        block
    })
}

/// A textured cover: deterministic small AC coefficients everywhere.
pub fn textured_jpeg(width: u16, height: u16, sampling: &[(u8, u8)], dri: u16) -> Vec<u8> {
    let mut rng = XorShift32::new(0x1234_5678);
    build_jpeg(width, height, sampling, dri, &mut |comp, bi| {
        let mut block = [0i16; 64];
        block[0] = 40 + (comp as i16) * 10 + (bi % 16) as i16;
        for zz in 1..20 {
            block[zz] = (rng.next_u32() % 16) as i16 - 8;
        }
        block
    })
}

/// Tiny deterministic PRNG so payload tests are reproducible without
/// seeding a full generator.
pub struct XorShift32(u32);

impl XorShift32 {
    pub fn new(seed: u32) -> Self {
        Self(seed.max(1))
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        x
    }

    pub fn bytes(&mut self, len: usize) -> Vec<u8> {
        (0..len).map(|_| (self.next_u32() >> 8) as u8).collect()
    }
}
