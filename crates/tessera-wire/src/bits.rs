use crate::WireError;

/// Read cursor over an immutable byte buffer.
///
/// Bits are consumed MSB to LSB within each byte, and the first bit read
/// becomes the most significant bit of a multi-bit result. Reading past the
/// end never fails: `read_bit` yields `false` without advancing, so an
/// over-long `read_bits` comes back zero-filled in its low bits. Callers that
/// must not read past the end check `bits_remaining` first (or use
/// `try_read_bits`).
#[derive(Clone, Debug)]
pub struct BitReader<'a> {
    data: &'a [u8],
    total_bits: usize,
    byte_pos: usize,
    bit_pos: u8,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            total_bits: data.len() * 8,
            byte_pos: 0,
            bit_pos: 0,
        }
    }

    /// Reader over the first `num_bytes` of `data` (clamped to its length).
    pub fn with_len(data: &'a [u8], num_bytes: usize) -> Self {
        Self::new(&data[..num_bytes.min(data.len())])
    }

    #[inline]
    pub fn bit_position(&self) -> usize {
        self.byte_pos * 8 + self.bit_pos as usize
    }

    #[inline]
    pub fn bits_remaining(&self) -> usize {
        self.total_bits - self.bit_position()
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.bits_remaining() == 0
    }

    pub fn reset(&mut self) {
        self.byte_pos = 0;
        self.bit_pos = 0;
    }

    pub fn read_bit(&mut self) -> bool {
        if self.byte_pos >= self.data.len() {
            return false;
        }
        let bit = self.data[self.byte_pos] & (0x80 >> self.bit_pos) != 0;
        self.bit_pos += 1;
        if self.bit_pos == 8 {
            self.bit_pos = 0;
            self.byte_pos += 1;
        }
        bit
    }

    /// Reads `count` bits (at most 32) as an unsigned integer, first bit most significant.
    pub fn read_bits(&mut self, count: u32) -> u32 {
        debug_assert!(count <= 32, "read_bits count {} > 32", count);
        let mut out = 0u32;
        for _ in 0..count.min(32) {
            out = (out << 1) | self.read_bit() as u32;
        }
        out
    }

    /// Like `read_bits`, but refuses to read past the end and leaves the cursor untouched on failure.
    pub fn try_read_bits(&mut self, count: u32) -> Result<u32, WireError> {
        let needed = count.min(32) as usize;
        let remaining = self.bits_remaining();
        if needed > remaining {
            return Err(WireError::Truncated { needed, remaining });
        }
        Ok(self.read_bits(count))
    }

    /// Four consecutive bytes interpreted as a little-endian IEEE-754 float.
    pub fn read_f32_le(&mut self) -> f32 {
        let mut b = [0u8; 4];
        for byte in &mut b {
            *byte = self.read_bits(8) as u8;
        }
        f32::from_le_bytes(b)
    }
}

/// Write-side mirror of [`BitReader`]; packs bits MSB-first into a growing buffer.
#[derive(Clone, Debug, Default)]
pub struct BitWriter {
    data: Vec<u8>,
    bit_len: usize,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    pub fn write_bit(&mut self, bit: bool) {
        let sub = self.bit_len % 8;
        if sub == 0 {
            self.data.push(0);
        }
        if bit {
            if let Some(last) = self.data.last_mut() {
                *last |= 0x80 >> sub;
            }
        }
        self.bit_len += 1;
    }

    /// Writes the low `count` bits of `value`, most significant first.
    pub fn write_bits(&mut self, value: u32, count: u32) {
        debug_assert!(count <= 32, "write_bits count {} > 32", count);
        for i in (0..count.min(32)).rev() {
            self.write_bit((value >> i) & 1 != 0);
        }
    }

    pub fn write_f32_le(&mut self, v: f32) {
        for b in v.to_le_bytes() {
            self.write_bits(b as u32, 8);
        }
    }

    /// Finished buffer; a trailing partial byte is zero-padded.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}
