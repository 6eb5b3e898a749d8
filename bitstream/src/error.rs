//! Error types for byte-level operations.

use std::fmt;

/// Result type for byte cursor operations.
pub type ByteResult<T> = Result<T, ByteError>;

/// Errors that can occur while reading or writing packed wire data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ByteError {
    /// Attempted to read past the end of the buffer.
    UnexpectedEof {
        /// Number of bytes requested.
        requested: usize,
        /// Number of bytes available.
        available: usize,
    },

    /// A face bitfield used more continuation bytes than a face mask can hold.
    BitfieldOverflow {
        /// Number of bytes consumed before giving up.
        bytes: usize,
    },

    /// A null-terminated string was not terminated inside the buffer.
    UnterminatedString {
        /// Offset at which the string started.
        start: usize,
    },

    /// Seek target lies outside the buffer.
    InvalidSeek {
        /// Requested absolute position.
        position: usize,
        /// Buffer length.
        len: usize,
    },
}

impl fmt::Display for ByteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof {
                requested,
                available,
            } => {
                write!(
                    f,
                    "attempted to read {requested} bytes but only {available} bytes available"
                )
            }
            Self::BitfieldOverflow { bytes } => {
                write!(f, "face bitfield overflow after {bytes} bytes")
            }
            Self::UnterminatedString { start } => {
                write!(f, "string starting at offset {start} is not null-terminated")
            }
            Self::InvalidSeek { position, len } => {
                write!(f, "cannot seek to {position} in a buffer of {len} bytes")
            }
        }
    }
}

impl std::error::Error for ByteError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_unexpected_eof() {
        let err = ByteError::UnexpectedEof {
            requested: 8,
            available: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("8 bytes"), "should mention requested bytes");
        assert!(msg.contains("3 bytes"), "should mention available bytes");
        assert!(msg.contains("read"), "should mention read operation");
    }

    #[test]
    fn error_display_bitfield_overflow() {
        let err = ByteError::BitfieldOverflow { bytes: 6 };
        assert!(err.to_string().contains("6 bytes"));
    }

    #[test]
    fn error_display_unterminated() {
        let err = ByteError::UnterminatedString { start: 12 };
        assert!(err.to_string().contains("12"));
    }

    #[test]
    fn error_equality() {
        let err1 = ByteError::UnexpectedEof {
            requested: 8,
            available: 3,
        };
        let err2 = err1.clone();
        let err3 = ByteError::UnexpectedEof {
            requested: 8,
            available: 4,
        };
        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
    }

    #[test]
    fn error_is_std_error() {
        fn assert_error<E: std::error::Error>() {}
        assert_error::<ByteError>();
    }
}
