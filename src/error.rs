// Error types for the tag and frame codec

use thiserror::Error;

/// Reasons a 4-byte MPEG audio frame header is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MpegHeaderError {
    #[error("frame sync not found")]
    InvalidFrameSync,
    #[error("reserved MPEG version")]
    InvalidVersion,
    #[error("reserved MPEG layer")]
    InvalidLayer,
    #[error("free or bad bitrate index")]
    InvalidBitrate,
    #[error("reserved sample rate index")]
    InvalidSampleRate,
    #[error("reserved emphasis")]
    InvalidEmphasis,
}

/// Main error type for all codec operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Offset or length outside the bounds of a buffer or string.
    #[error("range error: offset {offset} length {length} exceeds {available}")]
    Range {
        offset: usize,
        length: usize,
        available: usize,
    },

    /// Malformed tag or frame bytes.
    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid MPEG frame header: {0}")]
    Mpeg(#[from] MpegHeaderError),

    #[error("unsupported tag version 2.{major}.{minor}")]
    UnsupportedVersion { major: u8, minor: u8 },

    /// Header flag bits this codec does not understand.
    #[error("unsupported tag: {0}")]
    UnsupportedTag(String),

    /// No tag magic at the expected position.
    #[error("no tag found")]
    NoSuchTag,

    #[error("number format error: {0}")]
    NumberFormat(String),

    #[error("illegal argument: {0}")]
    IllegalArgument(String),

    /// I/O failure in the file layer.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True when the input simply carries no tag, as opposed to a malformed one.
    pub fn is_absent(&self) -> bool {
        matches!(self, Error::NoSuchTag)
    }

    pub(crate) fn range(offset: usize, length: usize, available: usize) -> Self {
        Error::Range {
            offset,
            length,
            available,
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidData(message.into())
    }
}

/// Result type alias using the codec error.
pub type Result<T> = std::result::Result<T, Error>;
