// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Coefficient-preserving baseline JPEG codec (zero external dependencies).
//!
//! Reads and writes baseline sequential JPEG files, exposing the quantized
//! DCT coefficients directly: no pixel-domain processing, no IDCT, no
//! requantization. This is the foundation for steganographic embedding,
//! which happens entirely in the DCT domain: coefficients decoded from the
//! re-encoded stream are equal, value for value, to the coefficients that
//! were encoded.
//!
//! Supports:
//! - Baseline sequential DCT (SOF0), 8-bit precision
//! - YCbCr, grayscale, and arbitrary component counts
//! - Chroma subsampling: 4:2:0, 4:2:2, 4:4:4
//! - Restart markers (DRI/RST), strictly validated
//! - Verbatim preservation of APPn/COM and all non-essential segments
//! - Optimal Huffman table rebuild for modified coefficients
//!
//! Does NOT support (rejected at parse time):
//! - Progressive, hierarchical, lossless, extended sequential (SOF1+)
//! - Arithmetic coding
//! - 12-bit precision

pub mod bitio;
pub mod coeff;
pub mod error;
pub mod frame;
pub mod huffman;
pub mod marker;
pub mod scan;
pub mod tables;

use coeff::{CoeffGrid, QuantTable};
use error::{JpegError, Result};
use frame::FrameInfo;
use huffman::{build_optimal_spec, encode_value};
use marker::{iterate_markers, parse_dri, parse_sos, MarkerSegment};
use scan::ScanComponent;
use tables::{parse_dht, parse_dqt, HuffmanSpec};

/// A decoded JPEG image providing access to its quantized DCT coefficients.
///
/// Created with [`JpegImage::from_bytes`]. After modifying coefficients,
/// [`JpegImage::to_bytes`] re-encodes; if the modifications introduced
/// symbols the original Huffman tables cannot express, call
/// [`JpegImage::rebuild_huffman_tables`] first.
#[derive(Clone)]
pub struct JpegImage {
    /// Frame information (dimensions, components, sampling factors).
    frame: FrameInfo,
    /// Coefficient grids, one per component in scan order.
    grids: Vec<CoeffGrid>,
    /// Quantization tables by ID.
    quant_tables: [Option<QuantTable>; 4],
    /// DC Huffman table specs by ID.
    dc_huff_specs: [Option<HuffmanSpec>; 4],
    /// AC Huffman table specs by ID.
    ac_huff_specs: [Option<HuffmanSpec>; 4],
    /// Scan component selectors from SOS.
    scan_components: Vec<ScanComponent>,
    /// Restart interval (0 = none).
    restart_interval: u16,
    /// All segments between SOI and SOS in original order, re-emitted
    /// verbatim on encode.
    raw_segments: Vec<MarkerSegment>,
    /// Raw SOS header body, for exact reconstruction.
    sos_data: Vec<u8>,
}

impl JpegImage {
    /// Parse a baseline JPEG byte stream.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let (entries, scan_start) = iterate_markers(data)?;

        let mut frame_info: Option<FrameInfo> = None;
        let mut quant_tables: [Option<QuantTable>; 4] = [None, None, None, None];
        let mut dc_huff_specs: [Option<HuffmanSpec>; 4] = [None, None, None, None];
        let mut ac_huff_specs: [Option<HuffmanSpec>; 4] = [None, None, None, None];
        let mut restart_interval: u16 = 0;
        let mut raw_segments = Vec::new();
        let mut sos_data = Vec::new();
        let mut scan_components = Vec::new();

        for entry in &entries {
            match entry.marker {
                marker::SOI | marker::EOI => {}
                marker::DQT => {
                    raw_segments.push(MarkerSegment {
                        marker: entry.marker,
                        data: entry.data.clone(),
                    });
                    for (id, qt) in parse_dqt(&entry.data)? {
                        quant_tables[id as usize] = Some(qt);
                    }
                }
                marker::DHT => {
                    raw_segments.push(MarkerSegment {
                        marker: entry.marker,
                        data: entry.data.clone(),
                    });
                    for spec in parse_dht(&entry.data)? {
                        let id = spec.id as usize;
                        if spec.class == 0 {
                            dc_huff_specs[id] = Some(spec);
                        } else {
                            ac_huff_specs[id] = Some(spec);
                        }
                    }
                }
                marker::SOF0 => {
                    raw_segments.push(MarkerSegment {
                        marker: entry.marker,
                        data: entry.data.clone(),
                    });
                    frame_info = Some(frame::parse_sof(&entry.data)?);
                }
                marker::DRI => {
                    raw_segments.push(MarkerSegment {
                        marker: entry.marker,
                        data: entry.data.clone(),
                    });
                    restart_interval = parse_dri(&entry.data)?;
                }
                marker::SOS => {
                    sos_data = entry.data.clone();
                    let fi = frame_info
                        .as_ref()
                        .ok_or(JpegError::InvalidMarkerData("SOS before SOF"))?;

                    for (comp_id, dc_id, ac_id) in parse_sos(&entry.data)? {
                        let comp_idx = fi
                            .components
                            .iter()
                            .position(|c| c.id == comp_id)
                            .ok_or(JpegError::UnknownComponentId(comp_id))?;
                        scan_components.push(ScanComponent {
                            comp_idx,
                            dc_table: dc_id as usize,
                            ac_table: ac_id as usize,
                        });
                    }
                }
                _ => {
                    // APPn, COM, DNL and friends, preserved for re-emission.
                    raw_segments.push(MarkerSegment {
                        marker: entry.marker,
                        data: entry.data.clone(),
                    });
                }
            }
        }

        let fi = frame_info.ok_or(JpegError::InvalidMarkerData("no SOF marker found"))?;
        if scan_components.is_empty() {
            return Err(JpegError::InvalidMarkerData("no SOS marker found"));
        }

        let (grids, _end_pos) = scan::decode_scan(
            data,
            scan_start,
            &fi,
            &scan_components,
            &dc_huff_specs,
            &ac_huff_specs,
            restart_interval,
        )?;

        Ok(Self {
            frame: fi,
            grids,
            quant_tables,
            dc_huff_specs,
            ac_huff_specs,
            scan_components,
            restart_interval,
            raw_segments,
            sos_data,
        })
    }

    /// Re-encode the (possibly modified) image to JPEG bytes.
    ///
    /// The decoded coefficients of the output equal the current grids
    /// coefficient for coefficient. Byte equality with the original input
    /// holds when nothing was modified.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();

        out.push(0xFF);
        out.push(marker::SOI);

        for seg in &self.raw_segments {
            out.push(0xFF);
            out.push(seg.marker);
            let length = (seg.data.len() + 2) as u16;
            out.extend_from_slice(&length.to_be_bytes());
            out.extend_from_slice(&seg.data);
        }

        out.push(0xFF);
        out.push(marker::SOS);
        let sos_length = (self.sos_data.len() + 2) as u16;
        out.extend_from_slice(&sos_length.to_be_bytes());
        out.extend_from_slice(&self.sos_data);

        let scan_bytes = scan::encode_scan(
            &self.frame,
            &self.scan_components,
            &self.grids,
            &self.dc_huff_specs,
            &self.ac_huff_specs,
            self.restart_interval,
        )?;
        out.extend_from_slice(&scan_bytes);

        out.push(0xFF);
        out.push(marker::EOI);

        Ok(out)
    }

    /// The coefficient grid of a component (scan order: 0=Y, 1=Cb, 2=Cr).
    pub fn coeff_grid(&self, component: usize) -> &CoeffGrid {
        &self.grids[component]
    }

    /// Mutable access to a component's coefficient grid.
    pub fn coeff_grid_mut(&mut self, component: usize) -> &mut CoeffGrid {
        &mut self.grids[component]
    }

    /// Frame information.
    pub fn frame_info(&self) -> &FrameInfo {
        &self.frame
    }

    /// A quantization table by ID.
    pub fn quant_table(&self, id: usize) -> Option<&QuantTable> {
        self.quant_tables[id].as_ref()
    }

    /// Number of components in the scan.
    pub fn num_components(&self) -> usize {
        self.grids.len()
    }

    /// Find the scan-order index of the component with the given SOF ID.
    pub fn component_index(&self, component_id: u8) -> Option<usize> {
        self.scan_components
            .iter()
            .position(|sc| self.frame.components[sc.comp_idx].id == component_id)
    }

    /// Rebuild Huffman tables from the current coefficient data.
    ///
    /// Counts the DC/AC symbols the encoder will actually emit (including
    /// restart-interval predictor resets), builds optimal tables, and
    /// replaces the DHT segments so the stream stays self-consistent. Call
    /// after coefficient modifications that the original tables cannot
    /// encode.
    pub fn rebuild_huffman_tables(&mut self) {
        let mut dc_freq: [Vec<u32>; 4] = [vec![], vec![], vec![], vec![]];
        let mut ac_freq: [Vec<u32>; 4] = [vec![], vec![], vec![], vec![]];

        for sc in &self.scan_components {
            if dc_freq[sc.dc_table].is_empty() {
                dc_freq[sc.dc_table] = vec![0u32; 256];
            }
            if ac_freq[sc.ac_table].is_empty() {
                ac_freq[sc.ac_table] = vec![0u32; 256];
            }
        }

        // Symbol counting must mirror encode_scan exactly.
        let mut dc_pred = vec![0i32; self.scan_components.len()];
        let mut mcu_count = 0usize;

        for mcu_row in 0..self.frame.mcus_tall as usize {
            for mcu_col in 0..self.frame.mcus_wide as usize {
                if self.restart_interval > 0
                    && mcu_count > 0
                    && mcu_count % self.restart_interval as usize == 0
                {
                    for pred in &mut dc_pred {
                        *pred = 0;
                    }
                }

                for (sci, sc) in self.scan_components.iter().enumerate() {
                    let comp = &self.frame.components[sc.comp_idx];
                    for v in 0..comp.v_sampling as usize {
                        for h in 0..comp.h_sampling as usize {
                            let br = mcu_row * comp.v_sampling as usize + v;
                            let bc = mcu_col * comp.h_sampling as usize + h;
                            let zz = self.grids[sci].block(br, bc);

                            let dc_diff = (zz[0] as i32 - dc_pred[sci]) as i16;
                            dc_pred[sci] = zz[0] as i32;
                            let (_, dc_size) = encode_value(dc_diff);
                            dc_freq[sc.dc_table][dc_size as usize] += 1;

                            let mut k = 1;
                            while k < 64 {
                                let mut run = 0usize;
                                while k + run < 64 && zz[k + run] == 0 {
                                    run += 1;
                                }
                                if k + run >= 64 {
                                    ac_freq[sc.ac_table][0x00] += 1;
                                    break;
                                }
                                while run >= 16 {
                                    ac_freq[sc.ac_table][0xF0] += 1;
                                    run -= 16;
                                    k += 16;
                                }
                                k += run;
                                let (_, ac_size) = encode_value(zz[k]);
                                ac_freq[sc.ac_table][(((run as u8) << 4) | ac_size) as usize] += 1;
                                k += 1;
                            }
                        }
                    }
                }

                mcu_count += 1;
            }
        }

        for (id, freq) in dc_freq.iter().enumerate() {
            if !freq.is_empty() {
                self.dc_huff_specs[id] = Some(build_optimal_spec(0, id as u8, freq));
            }
        }
        for (id, freq) in ac_freq.iter().enumerate() {
            if !freq.is_empty() {
                self.ac_huff_specs[id] = Some(build_optimal_spec(1, id as u8, freq));
            }
        }

        // Swap the DHT segments for the rebuilt tables, keeping the header
        // layout (one combined segment in front of SOF0).
        self.raw_segments.retain(|s| s.marker != marker::DHT);

        let sof_pos = self
            .raw_segments
            .iter()
            .position(|s| s.marker == marker::SOF0)
            .unwrap_or(self.raw_segments.len());

        let mut dht_data = Vec::new();
        for id in 0..4 {
            if let Some(spec) = &self.dc_huff_specs[id] {
                dht_data.push((spec.class << 4) | (spec.id & 0x0F));
                dht_data.extend_from_slice(&spec.bits);
                dht_data.extend_from_slice(&spec.huffval);
            }
        }
        for id in 0..4 {
            if let Some(spec) = &self.ac_huff_specs[id] {
                dht_data.push((spec.class << 4) | (spec.id & 0x0F));
                dht_data.extend_from_slice(&spec.bits);
                dht_data.extend_from_slice(&spec.huffval);
            }
        }

        self.raw_segments.insert(
            sof_pos,
            MarkerSegment {
                marker: marker::DHT,
                data: dht_data,
            },
        );
    }
}
