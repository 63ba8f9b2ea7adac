use crate::{BitReader, BitWriter, WireError};

/// Kind of heightfield carried by a layer payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerType {
    Land,
    Water,
    Wind,
    Cloud,
}

impl LayerType {
    pub const fn to_u8(self) -> u8 {
        match self {
            LayerType::Land => b'L',
            LayerType::Water => b'W',
            LayerType::Wind => b'7',
            LayerType::Cloud => b'8',
        }
    }

    pub const fn from_u8(v: u8) -> Option<LayerType> {
        match v {
            b'L' => Some(LayerType::Land),
            b'W' => Some(LayerType::Water),
            b'7' => Some(LayerType::Wind),
            b'8' => Some(LayerType::Cloud),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            LayerType::Land => "land",
            LayerType::Water => "water",
            LayerType::Wind => "wind",
            LayerType::Cloud => "cloud",
        }
    }
}

/// Header shared by every patch in one layer payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatchGroupHeader {
    pub stride: u16,
    pub patch_size: u8,
    pub layer_type: u8,
}

impl PatchGroupHeader {
    pub const BITS: usize = 16 + 8 + 8;

    pub fn new(stride: u16, patch_size: u8, layer: LayerType) -> Self {
        Self {
            stride,
            patch_size,
            layer_type: layer.to_u8(),
        }
    }

    pub fn read(bits: &mut BitReader<'_>) -> Result<Self, WireError> {
        let remaining = bits.bits_remaining();
        if remaining < Self::BITS {
            return Err(WireError::Truncated {
                needed: Self::BITS,
                remaining,
            });
        }
        Ok(Self {
            stride: bits.read_bits(16) as u16,
            patch_size: bits.read_bits(8) as u8,
            layer_type: bits.read_bits(8) as u8,
        })
    }

    pub fn write(&self, out: &mut BitWriter) {
        out.write_bits(self.stride as u32, 16);
        out.write_bits(self.patch_size as u32, 8);
        out.write_bits(self.layer_type as u32, 8);
    }

    #[inline]
    pub fn layer(&self) -> Option<LayerType> {
        LayerType::from_u8(self.layer_type)
    }
}

/// Per-patch header of the compressed land format.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PatchHeader {
    pub quant_wbits: u8,
    pub dc_offset: f32,
    pub range: u16,
    pub x: u8,
    pub y: u8,
    /// Bit width of one coefficient magnitude; derived, not on the wire.
    pub word_bits: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PatchHeaderRead {
    Header(PatchHeader),
    EndOfPatches,
}

impl PatchHeader {
    /// quantWBits value that terminates a patch list.
    pub const END_OF_PATCHES: u8 = 97;
    /// quantWBits + dc offset + range + patch ids.
    pub const BITS: usize = 8 + 32 + 16 + 10;

    pub fn new(quant_wbits: u8, dc_offset: f32, range: u16, x: u8, y: u8) -> Self {
        Self {
            quant_wbits,
            dc_offset,
            range,
            x,
            y,
            word_bits: Self::word_bits_for(quant_wbits),
        }
    }

    #[inline]
    pub const fn word_bits_for(quant_wbits: u8) -> u32 {
        (quant_wbits & 0x0f) as u32 + 2
    }

    /// Reads one header. Fails without consuming anything when fewer than
    /// [`PatchHeader::BITS`] remain, since a partial header cannot be a patch.
    pub fn read(bits: &mut BitReader<'_>) -> Result<PatchHeaderRead, WireError> {
        let remaining = bits.bits_remaining();
        if remaining < Self::BITS {
            return Err(WireError::Truncated {
                needed: Self::BITS,
                remaining,
            });
        }
        let quant_wbits = bits.read_bits(8) as u8;
        if quant_wbits == Self::END_OF_PATCHES {
            return Ok(PatchHeaderRead::EndOfPatches);
        }
        let dc_offset = bits.read_f32_le();
        let range = bits.read_bits(16) as u16;
        let ids = bits.read_bits(10);
        Ok(PatchHeaderRead::Header(Self::new(
            quant_wbits,
            dc_offset,
            range,
            (ids >> 5) as u8,
            (ids & 0x1f) as u8,
        )))
    }

    /// Writes the header. Patch ids carry five bits per axis.
    pub fn write(&self, out: &mut BitWriter) {
        debug_assert!(self.x < 32 && self.y < 32, "patch ids hold 5 bits per axis");
        out.write_bits(self.quant_wbits as u32, 8);
        out.write_f32_le(self.dc_offset);
        out.write_bits(self.range as u32, 16);
        out.write_bits(((self.x as u32 & 0x1f) << 5) | (self.y as u32 & 0x1f), 10);
    }

    pub fn write_end(out: &mut BitWriter) {
        out.write_bits(Self::END_OF_PATCHES as u32, 8);
    }
}
