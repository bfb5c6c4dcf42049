// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! DCT Difference Modulation.
//!
//! Payload bits are carried by the differences of fixed AC coefficient
//! pairs. Per block, the first K zigzag positions after DC are paired in
//! order: (1,2), (3,4), …; each pair encodes two bits. For a pair
//! (AC₁, AC₂) with D = AC₁ − AC₂ and offsets ε₁ = ⌊δ/4⌋, ε₂ = ⌊3δ/4⌋,
//! the target difference is
//!
//! ```text
//! (b₁,b₂)   D′
//! (0,0)    +(k·δ + ε₁)
//! (0,1)    +(k·δ + ε₂)
//! (1,0)    −(k·δ + ε₂)
//! (1,1)    −(k·δ + ε₁)
//! ```
//!
//! where k = |round(D/δ)| (round-half-to-even): the sign of D′ carries b₁,
//! the offset class carries b₂, and the magnitude stays within half a step
//! of |D|. The change is split evenly across the pair
//! (AC₁ += ⌈(D′−D)/2⌉, AC₂ −= ⌊(D′−D)/2⌋), which preserves AC₁+AC₂ up to
//! rounding and lands the new difference on D′ exactly.
//!
//! Extraction inverts this from the difference alone: sign of D gives b₁,
//! |D| mod δ against δ/2 gives b₂.

use crate::jpeg::coeff::CoeffGrid;

use super::cancel::CancelToken;
use super::capacity::frame_capacity_bits;
use super::config::DctdmConfig;
use super::error::StegoError;
use super::framing::{bits_to_bytes, bytes_to_bits, FRAME_HEADER_LEN};

/// Signed 11-bit coefficient range enforced by baseline JPEG.
pub const COEFF_MIN: i32 = -1024;
pub const COEFF_MAX: i32 = 1023;

/// Round `num / den` to the nearest integer, ties to even. `den` > 0.
fn round_half_even(num: i32, den: i32) -> i32 {
    debug_assert!(den > 0);
    let q = num.div_euclid(den);
    let r = num.rem_euclid(den);
    match (2 * r).cmp(&den) {
        std::cmp::Ordering::Less => q,
        std::cmp::Ordering::Greater => q + 1,
        std::cmp::Ordering::Equal => {
            if q % 2 == 0 {
                q
            } else {
                q + 1
            }
        }
    }
}

/// True if a pair must be passed over.
///
/// The clamp margin guarantees a non-skipped pair never needs clamping:
/// after embedding, each coefficient is bounded by max(|AC₁|,|AC₂|) + δ + 1.
/// Skipped pairs are left untouched, so embedder and extractor agree on
/// them. Optionally, all-zero pairs are skipped too.
fn pair_skipped(ac1: i32, ac2: i32, delta: i32, skip_zero_pairs: bool) -> bool {
    if skip_zero_pairs && ac1 == 0 && ac2 == 0 {
        return true;
    }
    let margin = delta + 1;
    ac1.abs() > COEFF_MAX - margin || ac2.abs() > COEFF_MAX - margin
}

/// Target difference for a bit pair.
fn target_difference(d: i32, b1: u8, b2: u8, delta: i32) -> i32 {
    let eps1 = delta / 4;
    let eps2 = 3 * delta / 4;
    let k = round_half_even(d, delta).abs();
    let eps = if b1 != b2 { eps2 } else { eps1 };
    let magnitude = k * delta + eps;
    if b1 == 1 {
        -magnitude
    } else {
        magnitude
    }
}

/// Recover the bit pair from a difference.
fn decode_pair(d: i32, delta: i32) -> (u8, u8) {
    let m = d.abs() % delta;
    let eps2_class = 2 * m >= delta;
    match (d < 0, eps2_class) {
        (false, false) => (0, 0),
        (false, true) => (0, 1),
        (true, true) => (1, 0),
        (true, false) => (1, 1),
    }
}

/// Embed a framed payload into the coefficient plane.
///
/// Traverses blocks in raster order and pairs in position order, writing
/// two bits per non-skipped pair until the frame is exhausted; remaining
/// pairs stay untouched. Capacity is checked up front against the nominal
/// pair count, so [`StegoError::ClampingExhausted`] can only arise from
/// clamp-margin skips eating the slack.
pub fn embed_frame(
    grid: &mut CoeffGrid,
    frame: &[u8],
    cfg: &DctdmConfig,
    cancel: &CancelToken,
) -> Result<(), StegoError> {
    let delta = cfg.delta as i32;
    let capacity_bits = frame_capacity_bits(grid, cfg);
    if frame.len() * 8 > capacity_bits {
        return Err(StegoError::PayloadTooLarge {
            needed: frame.len(),
            capacity: capacity_bits / 8,
        });
    }

    let bits = bytes_to_bits(frame);
    let mut bit_idx = 0usize;
    let mut clamp_skips = 0usize;

    'blocks: for bi in 0..grid.total_blocks() {
        for pair in 0..cfg.pairs() {
            if bit_idx >= bits.len() {
                break 'blocks;
            }
            cancel.check()?;

            let z1 = 1 + 2 * pair;
            let z2 = z1 + 1;
            let block = grid.block_at_mut(bi);
            let ac1 = block[z1] as i32;
            let ac2 = block[z2] as i32;

            if pair_skipped(ac1, ac2, delta, cfg.skip_zero_pairs) {
                if !(cfg.skip_zero_pairs && ac1 == 0 && ac2 == 0) {
                    clamp_skips += 1;
                }
                continue;
            }

            let d = ac1 - ac2;
            let d_new = target_difference(d, bits[bit_idx], bits[bit_idx + 1], delta);
            let c = d_new - d;
            let new_ac1 = ac1 + (c + 1).div_euclid(2);
            let new_ac2 = ac2 - c.div_euclid(2);
            debug_assert!((COEFF_MIN..=COEFF_MAX).contains(&new_ac1));
            debug_assert!((COEFF_MIN..=COEFF_MAX).contains(&new_ac2));
            debug_assert_eq!(new_ac1 - new_ac2, d_new);

            block[z1] = new_ac1 as i16;
            block[z2] = new_ac2 as i16;
            bit_idx += 2;
        }
    }

    if bit_idx < bits.len() {
        // The up-front check passed, so only skips can leave bits over.
        debug_assert!(clamp_skips > 0);
        return Err(StegoError::ClampingExhausted {
            embedded_bits: bit_idx,
        });
    }

    Ok(())
}

/// Walks non-skipped pairs of a plane, two payload bits at a time.
struct PairReader<'a> {
    grid: &'a CoeffGrid,
    delta: i32,
    pairs_per_block: usize,
    skip_zero_pairs: bool,
    block: usize,
    pair: usize,
}

impl<'a> PairReader<'a> {
    fn new(grid: &'a CoeffGrid, cfg: &DctdmConfig) -> Self {
        Self {
            grid,
            delta: cfg.delta as i32,
            pairs_per_block: cfg.pairs(),
            skip_zero_pairs: cfg.skip_zero_pairs,
            block: 0,
            pair: 0,
        }
    }

    /// The next embedded bit pair, or `None` when the plane is exhausted.
    fn next_bits(&mut self) -> Option<(u8, u8)> {
        while self.block < self.grid.total_blocks() {
            let z1 = 1 + 2 * self.pair;
            let block = self.grid.block_at(self.block);
            let ac1 = block[z1] as i32;
            let ac2 = block[z1 + 1] as i32;

            self.pair += 1;
            if self.pair == self.pairs_per_block {
                self.pair = 0;
                self.block += 1;
            }

            if pair_skipped(ac1, ac2, self.delta, self.skip_zero_pairs) {
                continue;
            }
            return Some(decode_pair(ac1 - ac2, self.delta));
        }
        None
    }

    fn read_bits(&mut self, count: usize, out: &mut Vec<u8>) -> Result<(), StegoError> {
        debug_assert!(count % 2 == 0);
        for _ in 0..count / 2 {
            let (b1, b2) = self.next_bits().ok_or(StegoError::PayloadTruncated)?;
            out.push(b1);
            out.push(b2);
        }
        Ok(())
    }
}

/// Extract a framed payload from the coefficient plane.
///
/// Reads the 4-byte length header, validates it against the plane's
/// capacity, then reads the declared number of payload bytes.
pub fn extract_frame(
    grid: &CoeffGrid,
    cfg: &DctdmConfig,
    cancel: &CancelToken,
) -> Result<Vec<u8>, StegoError> {
    let mut reader = PairReader::new(grid, cfg);

    cancel.check()?;
    let mut header_bits = Vec::with_capacity(FRAME_HEADER_LEN * 8);
    reader.read_bits(FRAME_HEADER_LEN * 8, &mut header_bits)?;
    let header = bits_to_bytes(&header_bits);
    let declared = u32::from_be_bytes([header[0], header[1], header[2], header[3]]);

    let capacity_bytes = frame_capacity_bits(grid, cfg) / 8;
    if declared as usize + FRAME_HEADER_LEN > capacity_bytes {
        return Err(StegoError::InvalidLength {
            declared,
            capacity: capacity_bytes,
        });
    }

    let mut payload_bits = Vec::with_capacity(declared as usize * 8);
    // Poll between byte-sized pair runs so huge payloads stay cancellable.
    for _ in 0..declared {
        cancel.check()?;
        reader.read_bits(8, &mut payload_bits)?;
    }

    Ok(bits_to_bytes(&payload_bits))
}
