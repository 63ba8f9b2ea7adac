//! Bit-level cursor and the fixed-layout headers of a terrain layer payload.
#![forbid(unsafe_code)]

mod bits;
mod header;

pub use bits::{BitReader, BitWriter};
pub use header::{LayerType, PatchGroupHeader, PatchHeader, PatchHeaderRead};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WireError {
    /// A fixed-width field needed more bits than the buffer has left.
    Truncated { needed: usize, remaining: usize },
}

impl std::fmt::Display for WireError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WireError::Truncated { needed, remaining } => write!(
                f,
                "truncated buffer: needed {} bits, {} remaining",
                needed, remaining
            ),
        }
    }
}

impl std::error::Error for WireError {}
