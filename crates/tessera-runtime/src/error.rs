use tessera_codec::PatchDecodeError;

/// Why a group header was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeaderFault {
    /// Fewer bits than a group header needs.
    TooShort,
    PatchSizeMismatch { expected: usize, got: usize },
    UnknownLayer(u8),
}

#[derive(Clone, Debug, PartialEq)]
pub enum TerrainError {
    /// The whole payload was dropped.
    MalformedHeader(HeaderFault),
    /// Bits ran out partway through a patch.
    TruncatedBuffer,
    PatchDecodeFailed(PatchDecodeError),
    OutOfRangeCoordinate { x: usize, y: usize },
}

impl std::fmt::Display for HeaderFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeaderFault::TooShort => write!(f, "payload too short for a group header"),
            HeaderFault::PatchSizeMismatch { expected, got } => {
                write!(f, "patch size {} does not match grid patch size {}", got, expected)
            }
            HeaderFault::UnknownLayer(t) => write!(f, "unknown layer type 0x{:02x}", t),
        }
    }
}

impl std::fmt::Display for TerrainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerrainError::MalformedHeader(fault) => write!(f, "malformed header: {}", fault),
            TerrainError::TruncatedBuffer => write!(f, "payload ends inside a patch"),
            TerrainError::PatchDecodeFailed(e) => write!(f, "patch decode failed: {}", e),
            TerrainError::OutOfRangeCoordinate { x, y } => {
                write!(f, "patch coordinate ({}, {}) out of range", x, y)
            }
        }
    }
}

impl std::error::Error for HeaderFault {}

impl std::error::Error for TerrainError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TerrainError::MalformedHeader(fault) => Some(fault),
            TerrainError::PatchDecodeFailed(e) => Some(e),
            _ => None,
        }
    }
}

impl From<HeaderFault> for TerrainError {
    fn from(fault: HeaderFault) -> Self {
        TerrainError::MalformedHeader(fault)
    }
}

impl From<PatchDecodeError> for TerrainError {
    fn from(e: PatchDecodeError) -> Self {
        match e {
            PatchDecodeError::Truncated { .. } => TerrainError::TruncatedBuffer,
            other => TerrainError::PatchDecodeFailed(other),
        }
    }
}
