//! Error types for wire-level field decoding.

use std::fmt;

use bitstream::ByteError;

/// Result type for wire field decoding.
pub type WireResult<T> = Result<T, WireError>;

/// Errors raised while reading protocol fields out of a block.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WireError {
    /// Underlying byte cursor error.
    Bytes(ByteError),

    /// A configured decode limit was exceeded.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },

    /// A text field was not valid UTF-8.
    InvalidUtf8 { field: &'static str },
}

/// Specific decode limits that can be exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    TextureEntryBytes,
    NameValueLines,
    TextBytes,
    ExtraParams,
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(err) => write!(f, "byte error: {err}"),
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
            Self::InvalidUtf8 { field } => write!(f, "field {field} is not valid UTF-8"),
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TextureEntryBytes => "texture entry bytes",
            Self::NameValueLines => "name-value lines",
            Self::TextBytes => "text bytes",
            Self::ExtraParams => "extra params",
        };
        write!(f, "{name}")
    }
}

impl std::error::Error for WireError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bytes(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ByteError> for WireError {
    fn from(err: ByteError) -> Self {
        Self::Bytes(err)
    }
}
