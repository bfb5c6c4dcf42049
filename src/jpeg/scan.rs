// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Baseline scan data decoding and encoding.
//!
//! Decodes the entropy-coded scan into one [`CoeffGrid`] per component and
//! re-encodes (possibly modified) grids back to entropy-coded bytes.
//! Handles interleaved MCU ordering, DC prediction, and restart markers.
//! Blocks are kept in zigzag order throughout; the decoder never
//! de-zigzags and the encoder emits the stored order directly.

use super::bitio::{BitReader, BitWriter};
use super::coeff::CoeffGrid;
use super::error::{JpegError, Result};
use super::frame::FrameInfo;
use super::huffman::{encode_value, extend_sign, HuffmanDecodeTable, HuffmanEncodeTable};
use super::tables::HuffmanSpec;

/// Table selectors for one scan component.
#[derive(Clone)]
pub struct ScanComponent {
    /// Index into `FrameInfo::components`.
    pub comp_idx: usize,
    /// DC Huffman table ID.
    pub dc_table: usize,
    /// AC Huffman table ID.
    pub ac_table: usize,
}

fn build_decode_tables(
    scan_components: &[ScanComponent],
    dc_specs: &[Option<HuffmanSpec>; 4],
    ac_specs: &[Option<HuffmanSpec>; 4],
) -> Result<(
    [Option<HuffmanDecodeTable>; 4],
    [Option<HuffmanDecodeTable>; 4],
)> {
    let mut dc_tables: [Option<HuffmanDecodeTable>; 4] = [None, None, None, None];
    let mut ac_tables: [Option<HuffmanDecodeTable>; 4] = [None, None, None, None];

    for sc in scan_components {
        if dc_tables[sc.dc_table].is_none() {
            let spec = dc_specs[sc.dc_table]
                .as_ref()
                .ok_or(JpegError::InvalidHuffmanTableId(sc.dc_table as u8))?;
            dc_tables[sc.dc_table] = Some(HuffmanDecodeTable::build(&spec.bits, &spec.huffval)?);
        }
        if ac_tables[sc.ac_table].is_none() {
            let spec = ac_specs[sc.ac_table]
                .as_ref()
                .ok_or(JpegError::InvalidHuffmanTableId(sc.ac_table as u8))?;
            ac_tables[sc.ac_table] = Some(HuffmanDecodeTable::build(&spec.bits, &spec.huffval)?);
        }
    }

    Ok((dc_tables, ac_tables))
}

/// Decode the entropy-coded scan into coefficient grids.
///
/// - `data`: the full JPEG byte stream
/// - `scan_start`: offset of the first entropy-coded byte (after SOS header)
/// - `restart_interval`: from DRI, 0 = no restarts
///
/// Returns one grid per scan component plus the end position of the scan.
pub fn decode_scan(
    data: &[u8],
    scan_start: usize,
    frame: &FrameInfo,
    scan_components: &[ScanComponent],
    dc_specs: &[Option<HuffmanSpec>; 4],
    ac_specs: &[Option<HuffmanSpec>; 4],
    restart_interval: u16,
) -> Result<(Vec<CoeffGrid>, usize)> {
    let (dc_tables, ac_tables) = build_decode_tables(scan_components, dc_specs, ac_specs)?;

    let mut grids: Vec<CoeffGrid> = scan_components
        .iter()
        .map(|sc| CoeffGrid::new(frame.blocks_wide(sc.comp_idx), frame.blocks_tall(sc.comp_idx)))
        .collect();

    // DC predictors are i32: accumulated diffs can exceed i16 transiently
    // in malformed streams.
    let mut dc_pred = vec![0i32; scan_components.len()];

    let mut reader = BitReader::new(data, scan_start);
    let mut mcu_count = 0usize;

    for mcu_row in 0..frame.mcus_tall as usize {
        for mcu_col in 0..frame.mcus_wide as usize {
            if restart_interval > 0
                && mcu_count > 0
                && mcu_count % restart_interval as usize == 0
            {
                // A restart marker is mandatory here; its absence means the
                // stream is out of sync.
                if reader.take_restart_marker()?.is_none() {
                    return Err(JpegError::MissingRestartMarker { mcu: mcu_count });
                }
                for pred in &mut dc_pred {
                    *pred = 0;
                }
            }

            for (sci, sc) in scan_components.iter().enumerate() {
                let comp = &frame.components[sc.comp_idx];
                let dc_tab = dc_tables[sc.dc_table].as_ref().unwrap();
                let ac_tab = ac_tables[sc.ac_table].as_ref().unwrap();

                for v in 0..comp.v_sampling as usize {
                    for h in 0..comp.h_sampling as usize {
                        let block_row = mcu_row * comp.v_sampling as usize + v;
                        let block_col = mcu_col * comp.h_sampling as usize + h;

                        let mut zz = [0i16; 64];

                        // DC: size category, magnitude bits, prediction.
                        // Baseline DC categories are 0..=11; anything else
                        // is a corrupt table.
                        let dc_size = dc_tab.decode(&mut reader)?;
                        if dc_size > 11 {
                            return Err(JpegError::InvalidHuffmanCode);
                        }
                        if dc_size > 0 {
                            let dc_bits = reader.read_bits(dc_size)?;
                            dc_pred[sci] += extend_sign(dc_bits, dc_size) as i32;
                        }
                        zz[0] = dc_pred[sci].clamp(i16::MIN as i32, i16::MAX as i32) as i16;

                        // AC: run/size symbols until EOB or position 63.
                        let mut k = 1;
                        while k < 64 {
                            let rs = ac_tab.decode(&mut reader)?;
                            let run = (rs >> 4) as usize;
                            let size = rs & 0x0F;

                            if size == 0 {
                                if run == 15 {
                                    // ZRL: sixteen zeros.
                                    k += 16;
                                    continue;
                                }
                                // EOB (run == 0); other run values are
                                // undefined in baseline, treat as EOB.
                                break;
                            }

                            k += run;
                            if k >= 64 {
                                return Err(JpegError::InvalidHuffmanCode);
                            }
                            let ac_bits = reader.read_bits(size)?;
                            zz[k] = extend_sign(ac_bits, size);
                            k += 1;
                        }

                        grids[sci]
                            .block_mut(block_row, block_col)
                            .copy_from_slice(&zz);
                    }
                }
            }

            mcu_count += 1;
        }
    }

    Ok((grids, reader.position()))
}

/// Encode coefficient grids back to entropy-coded scan bytes.
///
/// Returns the raw scan data (without the SOS header, with restart markers
/// inserted when `restart_interval > 0`). All 0xFF data bytes are stuffed.
pub fn encode_scan(
    frame: &FrameInfo,
    scan_components: &[ScanComponent],
    grids: &[CoeffGrid],
    dc_specs: &[Option<HuffmanSpec>; 4],
    ac_specs: &[Option<HuffmanSpec>; 4],
    restart_interval: u16,
) -> Result<Vec<u8>> {
    let mut dc_tables: [Option<HuffmanEncodeTable>; 4] = [None, None, None, None];
    let mut ac_tables: [Option<HuffmanEncodeTable>; 4] = [None, None, None, None];

    for sc in scan_components {
        if dc_tables[sc.dc_table].is_none() {
            let spec = dc_specs[sc.dc_table]
                .as_ref()
                .ok_or(JpegError::InvalidHuffmanTableId(sc.dc_table as u8))?;
            dc_tables[sc.dc_table] = Some(HuffmanEncodeTable::build(&spec.bits, &spec.huffval));
        }
        if ac_tables[sc.ac_table].is_none() {
            let spec = ac_specs[sc.ac_table]
                .as_ref()
                .ok_or(JpegError::InvalidHuffmanTableId(sc.ac_table as u8))?;
            ac_tables[sc.ac_table] = Some(HuffmanEncodeTable::build(&spec.bits, &spec.huffval));
        }
    }

    // Byte accumulator so restart markers can sit between flushed segments.
    let mut output = Vec::new();
    let mut writer = BitWriter::new();
    let mut dc_pred = vec![0i32; scan_components.len()];
    let mut mcu_count = 0usize;
    let mut restart_count = 0u16;

    for mcu_row in 0..frame.mcus_tall as usize {
        for mcu_col in 0..frame.mcus_wide as usize {
            if restart_interval > 0
                && mcu_count > 0
                && mcu_count % restart_interval as usize == 0
            {
                // Flush with 1-padding, then the marker (markers are not
                // byte-stuffed).
                output.extend_from_slice(&std::mem::take(&mut writer).flush());
                output.push(0xFF);
                output.push(0xD0 + (restart_count % 8) as u8);
                restart_count += 1;

                for pred in &mut dc_pred {
                    *pred = 0;
                }
            }

            for (sci, sc) in scan_components.iter().enumerate() {
                let comp = &frame.components[sc.comp_idx];
                let dc_tab = dc_tables[sc.dc_table].as_ref().unwrap();
                let ac_tab = ac_tables[sc.ac_table].as_ref().unwrap();

                for v in 0..comp.v_sampling as usize {
                    for h in 0..comp.h_sampling as usize {
                        let block_row = mcu_row * comp.v_sampling as usize + v;
                        let block_col = mcu_col * comp.h_sampling as usize + h;
                        let zz = grids[sci].block(block_row, block_col);

                        // DC difference.
                        let dc_diff = (zz[0] as i32 - dc_pred[sci]) as i16;
                        dc_pred[sci] = zz[0] as i32;
                        let (dc_bits, dc_size) = encode_value(dc_diff);
                        let (dc_code, dc_code_len) = dc_tab.encode(dc_size)?;
                        writer.write_bits(dc_code, dc_code_len);
                        if dc_size > 0 {
                            writer.write_bits(dc_bits, dc_size);
                        }

                        // AC run-length coding.
                        let mut k = 1;
                        while k < 64 {
                            let mut run = 0usize;
                            while k + run < 64 && zz[k + run] == 0 {
                                run += 1;
                            }

                            if k + run >= 64 {
                                let (eob_code, eob_len) = ac_tab.encode(0x00)?;
                                writer.write_bits(eob_code, eob_len);
                                break;
                            }

                            while run >= 16 {
                                let (zrl_code, zrl_len) = ac_tab.encode(0xF0)?;
                                writer.write_bits(zrl_code, zrl_len);
                                run -= 16;
                                k += 16;
                            }

                            k += run;
                            let (ac_bits, ac_size) = encode_value(zz[k]);
                            let rs = ((run as u8) << 4) | ac_size;
                            let (ac_code, ac_code_len) = ac_tab.encode(rs)?;
                            writer.write_bits(ac_code, ac_code_len);
                            if ac_size > 0 {
                                writer.write_bits(ac_bits, ac_size);
                            }
                            k += 1;
                        }
                    }
                }
            }

            mcu_count += 1;
        }
    }

    output.extend_from_slice(&writer.flush());
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jpeg::frame::Component;

    fn gray_frame(blocks: u16) -> FrameInfo {
        FrameInfo {
            precision: 8,
            height: blocks * 8,
            width: blocks * 8,
            components: vec![Component {
                id: 1,
                h_sampling: 1,
                v_sampling: 1,
                quant_table_id: 0,
            }],
            max_h_sampling: 1,
            max_v_sampling: 1,
            mcus_wide: blocks,
            mcus_tall: blocks,
        }
    }

    fn full_specs() -> ([Option<HuffmanSpec>; 4], [Option<HuffmanSpec>; 4]) {
        // Tables covering every DC size and every AC run/size symbol, so
        // arbitrary blocks are encodable.
        let mut dc_freq = vec![0u32; 256];
        for s in 0..=11usize {
            dc_freq[s] = 1 + s as u32;
        }
        let mut ac_freq = vec![0u32; 256];
        for run in 0..=15u16 {
            for size in 1..=10u16 {
                ac_freq[((run << 4) | size) as usize] = 1;
            }
        }
        ac_freq[0x00] = 100; // EOB
        ac_freq[0xF0] = 10; // ZRL

        let dc = crate::jpeg::huffman::build_optimal_spec(0, 0, &dc_freq);
        let ac = crate::jpeg::huffman::build_optimal_spec(1, 0, &ac_freq);
        (
            [Some(dc), None, None, None],
            [Some(ac), None, None, None],
        )
    }

    fn scan_comp() -> Vec<ScanComponent> {
        vec![ScanComponent {
            comp_idx: 0,
            dc_table: 0,
            ac_table: 0,
        }]
    }

    #[test]
    fn encode_decode_fixpoint_single_block() {
        let frame = gray_frame(1);
        let (dc_specs, ac_specs) = full_specs();
        let scs = scan_comp();

        let mut grid = CoeffGrid::new(1, 1);
        grid.set(0, 0, 0, 37);
        grid.set(0, 0, 1, -5);
        grid.set(0, 0, 7, 12);
        grid.set(0, 0, 40, -1);
        grid.set(0, 0, 63, 3);

        let bytes =
            encode_scan(&frame, &scs, &[grid.clone()], &dc_specs, &ac_specs, 0).unwrap();
        let (grids, _) =
            decode_scan(&bytes, 0, &frame, &scs, &dc_specs, &ac_specs, 0).unwrap();
        assert_eq!(grids[0], grid);
    }

    #[test]
    fn encode_decode_fixpoint_many_blocks() {
        let frame = gray_frame(4);
        let (dc_specs, ac_specs) = full_specs();
        let scs = scan_comp();

        let mut grid = CoeffGrid::new(4, 4);
        for bi in 0..16 {
            let block = grid.block_at_mut(bi);
            block[0] = (bi as i16) * 11 - 80;
            block[1] = bi as i16 % 3 - 1;
            block[20] = if bi % 2 == 0 { 4 } else { 0 };
            block[35] = -(bi as i16);
        }

        let bytes =
            encode_scan(&frame, &scs, &[grid.clone()], &dc_specs, &ac_specs, 0).unwrap();
        let (grids, _) =
            decode_scan(&bytes, 0, &frame, &scs, &dc_specs, &ac_specs, 0).unwrap();
        assert_eq!(grids[0], grid);
    }

    #[test]
    fn restart_markers_roundtrip() {
        let frame = gray_frame(4); // 16 MCUs
        let (dc_specs, ac_specs) = full_specs();
        let scs = scan_comp();

        let mut grid = CoeffGrid::new(4, 4);
        for bi in 0..16 {
            grid.block_at_mut(bi)[0] = 100 + bi as i16;
        }

        let bytes =
            encode_scan(&frame, &scs, &[grid.clone()], &dc_specs, &ac_specs, 4).unwrap();

        // Three restart markers for 16 MCUs at interval 4, cycling RST0..2.
        let rst_count = bytes
            .windows(2)
            .filter(|w| w[0] == 0xFF && (w[1] & 0xF8) == 0xD0)
            .count();
        assert_eq!(rst_count, 3);

        let (grids, _) =
            decode_scan(&bytes, 0, &frame, &scs, &dc_specs, &ac_specs, 4).unwrap();
        assert_eq!(grids[0], grid);
    }

    #[test]
    fn missing_restart_marker_detected() {
        let frame = gray_frame(4);
        let (dc_specs, ac_specs) = full_specs();
        let scs = scan_comp();

        let mut grid = CoeffGrid::new(4, 4);
        for bi in 0..16 {
            grid.block_at_mut(bi)[0] = 10 + bi as i16;
        }

        // Encoded without restarts, decoded expecting them.
        let bytes = encode_scan(&frame, &scs, &[grid], &dc_specs, &ac_specs, 0).unwrap();
        let result = decode_scan(&bytes, 0, &frame, &scs, &dc_specs, &ac_specs, 4);
        assert!(matches!(
            result,
            Err(JpegError::MissingRestartMarker { mcu: 4 })
        ));
    }

    #[test]
    fn zrl_runs_roundtrip() {
        let frame = gray_frame(1);
        let (dc_specs, ac_specs) = full_specs();
        let scs = scan_comp();

        // A lone coefficient at zigzag 40 forces two ZRLs plus a run.
        let mut grid = CoeffGrid::new(1, 1);
        grid.set(0, 0, 40, 9);

        let bytes =
            encode_scan(&frame, &scs, &[grid.clone()], &dc_specs, &ac_specs, 0).unwrap();
        let (grids, _) =
            decode_scan(&bytes, 0, &frame, &scs, &dc_specs, &ac_specs, 0).unwrap();
        assert_eq!(grids[0], grid);
    }
}
