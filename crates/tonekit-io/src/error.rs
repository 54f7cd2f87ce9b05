//! Error types for I/O operations.
//!
//! Every decode or encode failure surfaces as an [`IoError`]; nothing falls
//! back to a default image.

use std::io;
use thiserror::Error;

/// I/O operation error.
#[derive(Debug, Error)]
pub enum IoError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Unsupported format, or a format that cannot hold this pixel type.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Invalid or corrupted file.
    #[error("invalid file: {0}")]
    InvalidFile(String),

    /// Decoding error reported by a codec.
    #[error("decode error: {0}")]
    DecodeError(String),

    /// Encoding error reported by a codec.
    #[error("encode error: {0}")]
    EncodeError(String),

    /// Unsupported bit depth or color type.
    #[error("unsupported bit depth: {0}")]
    UnsupportedBitDepth(String),

    /// Decoded samples do not form a valid image buffer.
    #[error(transparent)]
    Buffer(#[from] tonekit_core::Error),
}

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;
