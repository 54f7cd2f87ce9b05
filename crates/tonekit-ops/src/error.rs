//! Error types for image operations.

use thiserror::Error;

/// Error type for image operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Images have incompatible sizes.
    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    /// Buffer-level failure from tonekit-core.
    #[error(transparent)]
    Core(#[from] tonekit_core::Error),
}

/// Result type for image operations.
pub type OpsResult<T> = Result<T, OpsError>;
