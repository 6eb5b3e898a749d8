//! Error types for texture-entry operations.

use std::fmt;

use bitstream::ByteError;

/// Result type for texture-entry operations.
pub type TextureResult<T> = Result<T, TextureError>;

/// Errors that can occur while building or decoding a texture entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureError {
    /// Face index outside the addressable range.
    NoSuchFace {
        /// The requested face index.
        index: i64,
        /// Number of addressable faces.
        max: usize,
    },

    /// The binary form could not be decoded.
    Malformed(ByteError),
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSuchFace { index, max } => {
                write!(f, "no such face {index} (entries hold {max} faces)")
            }
            Self::Malformed(err) => write!(f, "malformed texture entry: {err}"),
        }
    }
}

impl std::error::Error for TextureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Malformed(err) => Some(err),
            Self::NoSuchFace { .. } => None,
        }
    }
}

impl From<ByteError> for TextureError {
    fn from(err: ByteError) -> Self {
        Self::Malformed(err)
    }
}
