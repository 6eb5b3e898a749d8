//! Error types for object-update decoding.

use std::fmt;

use bitstream::ByteError;
use texture::TextureError;
use wire::{LimitKind, WireError};

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while decoding one object-update block.
///
/// Each error concerns a single block; callers skip the block and keep
/// processing the rest of the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Byte cursor error (truncated block).
    Bytes(ByteError),

    /// Wire field error.
    Wire(WireError),

    /// Embedded texture entry could not be decoded.
    Texture(TextureError),

    /// Packed motion data had a length no layout uses.
    MotionDataLength { len: usize },

    /// Terse block shorter than its fixed layout.
    TerseDataLength { expected: usize, actual: usize },

    /// A length prefix points past the end of the block.
    LengthPrefix {
        field: &'static str,
        declared: usize,
        available: usize,
    },

    /// Limits exceeded.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(e) => write!(f, "byte error: {e}"),
            Self::Wire(e) => write!(f, "wire error: {e}"),
            Self::Texture(e) => write!(f, "texture entry: {e}"),
            Self::MotionDataLength { len } => {
                write!(f, "unsupported motion data length {len}")
            }
            Self::TerseDataLength { expected, actual } => {
                write!(f, "terse block too short: need {expected}, have {actual}")
            }
            Self::LengthPrefix {
                field,
                declared,
                available,
            } => {
                write!(
                    f,
                    "{field} declares {declared} bytes but only {available} remain"
                )
            }
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bytes(e) => Some(e),
            Self::Wire(e) => Some(e),
            Self::Texture(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ByteError> for CodecError {
    fn from(err: ByteError) -> Self {
        Self::Bytes(err)
    }
}

impl From<WireError> for CodecError {
    fn from(err: WireError) -> Self {
        Self::Wire(err)
    }
}

impl From<TextureError> for CodecError {
    fn from(err: TextureError) -> Self {
        Self::Texture(err)
    }
}

/// Fails with [`CodecError::LimitsExceeded`] when `actual > limit`.
pub(crate) fn check_limit(kind: LimitKind, limit: usize, actual: usize) -> CodecResult<()> {
    if actual > limit {
        return Err(CodecError::LimitsExceeded {
            kind,
            limit,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_motion_length() {
        let err = CodecError::MotionDataLength { len: 17 };
        assert!(err.to_string().contains("17"));
    }

    #[test]
    fn error_display_limits() {
        let err = CodecError::LimitsExceeded {
            kind: LimitKind::NameValueLines,
            limit: 8,
            actual: 9,
        };
        let msg = err.to_string();
        assert!(msg.contains("name-value lines"));
        assert!(msg.contains("9 > 8"));
    }

    #[test]
    fn error_from_bytes() {
        let err: CodecError = ByteError::UnexpectedEof {
            requested: 4,
            available: 1,
        }
        .into();
        assert!(matches!(err, CodecError::Bytes(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn limit_check() {
        assert!(check_limit(LimitKind::ExtraParams, 4, 4).is_ok());
        assert!(check_limit(LimitKind::ExtraParams, 4, 5).is_err());
    }
}
