//! Patch decoding: the pluggable decoder seam and the DCT land decoder.
#![forbid(unsafe_code)]

mod dct;

pub use dct::{DctPatchDecoder, write_flat_patch};

use tessera_wire::{BitReader, PatchGroupHeader, PatchHeader};

/// One patch of height samples, row-major, `patch_size * patch_size` long.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedPatch {
    pub header: PatchHeader,
    pub height_data: Vec<f32>,
}

impl DecodedPatch {
    pub fn new(header: PatchHeader, height_data: Vec<f32>) -> Self {
        Self {
            header,
            height_data,
        }
    }

    /// Patch with every sample set to `height`; handy for synthetic updates.
    pub fn flat(x: u8, y: u8, patch_size: usize, height: f32) -> Self {
        Self::new(
            PatchHeader::new(0, height, 0, x, y),
            vec![height; patch_size * patch_size],
        )
    }

    #[inline]
    pub fn x(&self) -> u8 {
        self.header.x
    }

    #[inline]
    pub fn y(&self) -> u8 {
        self.header.y
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PatchDecodeError {
    /// Coefficient bits ran out before the patch was complete.
    Truncated { x: u8, y: u8 },
    /// Reconstruction produced NaN or infinite samples.
    NonFinite { x: u8, y: u8 },
    SizeMismatch { expected: usize, got: usize },
}

impl std::fmt::Display for PatchDecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatchDecodeError::Truncated { x, y } => {
                write!(f, "patch ({}, {}) truncated mid-coefficients", x, y)
            }
            PatchDecodeError::NonFinite { x, y } => {
                write!(f, "patch ({}, {}) decoded to non-finite heights", x, y)
            }
            PatchDecodeError::SizeMismatch { expected, got } => {
                write!(f, "patch has {} samples, expected {}", got, expected)
            }
        }
    }
}

impl std::error::Error for PatchDecodeError {}

/// Turns the bits that follow a group header into patches.
///
/// Implementations must be deterministic, must never read past
/// `bits.bits_remaining()`, and must emit exactly `patch_size * patch_size`
/// samples per patch or fail that patch. A failed patch does not end the
/// payload; `None` does.
pub trait PatchDecoder {
    fn next_patch(
        &mut self,
        bits: &mut BitReader<'_>,
        group: &PatchGroupHeader,
    ) -> Option<Result<DecodedPatch, PatchDecodeError>>;
}

impl<D: PatchDecoder + ?Sized> PatchDecoder for &mut D {
    fn next_patch(
        &mut self,
        bits: &mut BitReader<'_>,
        group: &PatchGroupHeader,
    ) -> Option<Result<DecodedPatch, PatchDecodeError>> {
        (**self).next_patch(bits, group)
    }
}

/// Iterator over every patch a decoder yields for one payload.
pub struct Patches<'r, 'b, D: ?Sized> {
    decoder: &'r mut D,
    bits: &'r mut BitReader<'b>,
    group: PatchGroupHeader,
}

pub fn patches<'r, 'b, D: PatchDecoder + ?Sized>(
    decoder: &'r mut D,
    bits: &'r mut BitReader<'b>,
    group: PatchGroupHeader,
) -> Patches<'r, 'b, D> {
    Patches {
        decoder,
        bits,
        group,
    }
}

impl<D: PatchDecoder + ?Sized> Iterator for Patches<'_, '_, D> {
    type Item = Result<DecodedPatch, PatchDecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.decoder.next_patch(self.bits, &self.group)
    }
}
