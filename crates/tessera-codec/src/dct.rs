use std::f32::consts::{FRAC_1_SQRT_2, PI};

use tessera_wire::{BitReader, BitWriter, PatchGroupHeader, PatchHeader, PatchHeaderRead};

use crate::{DecodedPatch, PatchDecodeError, PatchDecoder};

/// Lookup tables for one patch edge length.
#[derive(Clone, Debug)]
struct DctTables {
    size: usize,
    dequantize: Vec<f32>,
    // zigzag position of each row-major coefficient
    copy_matrix: Vec<usize>,
    // cosines[u * size + n] = cos((2n + 1) * u * pi / (2 * size))
    cosines: Vec<f32>,
}

impl DctTables {
    fn new(size: usize) -> Self {
        let mut dequantize = vec![0.0f32; size * size];
        for j in 0..size {
            for i in 0..size {
                dequantize[j * size + i] = 1.0 + 2.0 * (i + j) as f32;
            }
        }

        let half_step = PI * 0.5 / size as f32;
        let mut cosines = vec![0.0f32; size * size];
        for u in 0..size {
            for n in 0..size {
                cosines[u * size + n] = ((2 * n + 1) as f32 * u as f32 * half_step).cos();
            }
        }

        Self {
            size,
            dequantize,
            copy_matrix: zigzag(size),
            cosines,
        }
    }

    fn idct_column(&self, line_in: &[f32], line_out: &mut [f32], column: usize) {
        let n_sz = self.size;
        for n in 0..n_sz {
            let mut total = FRAC_1_SQRT_2 * line_in[column];
            for u in 1..n_sz {
                total += line_in[u * n_sz + column] * self.cosines[u * n_sz + n];
            }
            line_out[n_sz * n + column] = total;
        }
    }

    fn idct_line(&self, line_in: &[f32], line_out: &mut [f32], line: usize) {
        let n_sz = self.size;
        let scale = 2.0 / n_sz as f32;
        let row = line * n_sz;
        for n in 0..n_sz {
            let mut total = FRAC_1_SQRT_2 * line_in[row];
            for u in 1..n_sz {
                total += line_in[row + u] * self.cosines[u * n_sz + n];
            }
            line_out[row + n] = total * scale;
        }
    }
}

/// Zigzag scan order: entry `j * size + i` is the position of coefficient
/// (i, j) in the transmitted sequence.
fn zigzag(size: usize) -> Vec<usize> {
    let mut out = vec![0usize; size * size];
    if size == 1 {
        return out;
    }
    let (mut i, mut j) = (0usize, 0usize);
    let mut diag = false;
    let mut right = true;
    let mut count = 0;
    while i < size && j < size {
        out[j * size + i] = count;
        count += 1;
        if !diag {
            if right {
                if i < size - 1 {
                    i += 1;
                } else {
                    j += 1;
                }
                right = false;
            } else {
                if j < size - 1 {
                    j += 1;
                } else {
                    i += 1;
                }
                right = true;
            }
            diag = true;
        } else if right {
            i += 1;
            j -= 1;
            if i == size - 1 || j == 0 {
                diag = false;
            }
        } else {
            i -= 1;
            j += 1;
            if j == size - 1 || i == 0 {
                diag = false;
            }
        }
    }
    out
}

/// Decoder for the quantized-DCT land patch format.
///
/// Each patch is a [`PatchHeader`] followed by run-coded coefficients:
/// `0` is a zero coefficient, `1 0` ends the block, `1 1 s m` is a magnitude
/// `m` of `word_bits` bits negated when `s` is set.
#[derive(Clone, Debug, Default)]
pub struct DctPatchDecoder {
    tables: Option<DctTables>,
    coeffs: Vec<i32>,
    block: Vec<f32>,
    scratch: Vec<f32>,
}

impl DctPatchDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_patch_size(size: usize) -> Self {
        let mut d = Self::default();
        d.tables_for(size);
        d
    }

    fn tables_for(&mut self, size: usize) -> &DctTables {
        if self.tables.as_ref().map(|t| t.size) != Some(size) {
            self.tables = Some(DctTables::new(size));
        }
        self.tables.get_or_insert_with(|| DctTables::new(size))
    }

    fn read_coefficients(
        &mut self,
        bits: &mut BitReader<'_>,
        header: &PatchHeader,
        count: usize,
    ) -> Result<(), PatchDecodeError> {
        let truncated = PatchDecodeError::Truncated {
            x: header.x,
            y: header.y,
        };
        self.coeffs.clear();
        self.coeffs.resize(count, 0);
        for n in 0..count {
            if bits.try_read_bits(1).map_err(|_| truncated.clone())? == 0 {
                continue;
            }
            if bits.try_read_bits(1).map_err(|_| truncated.clone())? == 0 {
                // end of block; the rest stays zero
                break;
            }
            let negative = bits.try_read_bits(1).map_err(|_| truncated.clone())? != 0;
            let magnitude = bits
                .try_read_bits(header.word_bits)
                .map_err(|_| truncated.clone())? as i32;
            self.coeffs[n] = if negative { -magnitude } else { magnitude };
        }
        Ok(())
    }

    fn reconstruct(&mut self, header: &PatchHeader, size: usize) -> Vec<f32> {
        let count = size * size;
        self.block.clear();
        self.block.resize(count, 0.0);
        self.scratch.clear();
        self.scratch.resize(count, 0.0);
        let mut block = std::mem::take(&mut self.block);
        let mut scratch = std::mem::take(&mut self.scratch);
        let coeffs = std::mem::take(&mut self.coeffs);

        let tables = self.tables_for(size);
        for n in 0..count {
            block[n] = coeffs[tables.copy_matrix[n]] as f32 * tables.dequantize[n];
        }
        for column in 0..size {
            tables.idct_column(&block, &mut scratch, column);
        }
        for line in 0..size {
            tables.idct_line(&scratch, &mut block, line);
        }

        let prequant = (header.quant_wbits >> 4) as u32 + 2;
        let mult = header.range as f32 / (1u32 << prequant) as f32;
        let addval = mult * (1u32 << (prequant - 1)) as f32 + header.dc_offset;
        let out = block.iter().map(|v| v * mult + addval).collect();

        self.block = block;
        self.scratch = scratch;
        self.coeffs = coeffs;
        out
    }
}

impl PatchDecoder for DctPatchDecoder {
    fn next_patch(
        &mut self,
        bits: &mut BitReader<'_>,
        group: &PatchGroupHeader,
    ) -> Option<Result<DecodedPatch, PatchDecodeError>> {
        let size = group.patch_size as usize;
        if size == 0 {
            return None;
        }
        let header = match PatchHeader::read(bits) {
            Ok(PatchHeaderRead::Header(h)) => h,
            Ok(PatchHeaderRead::EndOfPatches) => return None,
            Err(e) => {
                log::debug!(target: "terrain", "patch list ends: {}", e);
                return None;
            }
        };
        if let Err(e) = self.read_coefficients(bits, &header, size * size) {
            return Some(Err(e));
        }
        let heights = self.reconstruct(&header, size);
        if heights.iter().any(|h| !h.is_finite()) {
            return Some(Err(PatchDecodeError::NonFinite {
                x: header.x,
                y: header.y,
            }));
        }
        Some(Ok(DecodedPatch::new(header, heights)))
    }
}

/// Encodes a patch whose every sample decodes to exactly `height`: a DC-only
/// header with zero range followed by an immediate end of block.
pub fn write_flat_patch(out: &mut BitWriter, x: u8, y: u8, height: f32) {
    PatchHeader::new(0, height, 0, x, y).write(out);
    out.write_bit(true);
    out.write_bit(false);
}
