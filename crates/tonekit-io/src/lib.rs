//! # tonekit-io
//!
//! Image loading and saving for the tonemap and compose drivers.
//!
//! | Format | Read float | Read bytes | Write |
//! |--------|------------|------------|-------|
//! | Radiance HDR (`.hdr`, `.pic`) | linear RGB, alpha 1.0 | gamma encoded, alpha 255 | float |
//! | PNG (`.png`) | linearized RGB, linear alpha | RGBA8 | bytes |
//!
//! Formats are detected by magic bytes when reading, falling back to the
//! extension. Writing picks the format by extension.
//!
//! # Example
//!
//! ```rust,no_run
//! use tonekit_io::{decode_float, encode_bytes};
//! use tonekit_core::LdrImage;
//!
//! tonekit_io::init();
//! let hdr = decode_float("scene.hdr")?;
//! encode_bytes("flat.png", &LdrImage::new(hdr.width(), hdr.height()))?;
//! # Ok::<(), tonekit_io::IoError>(())
//! ```

#![warn(missing_docs)]

pub mod detect;
mod error;
pub mod hdr;
pub mod png;
pub mod registry;
mod traits;

pub use detect::Format;
pub use error::{IoError, IoResult};
pub use registry::{FormatInfo, FormatRegistry};
pub use traits::ImageCodec;

use std::path::Path;
use tonekit_core::{HdrImage, LdrImage};

/// Initializes the codec layer and returns the shared registry.
///
/// Idempotent: every call returns the same instance.
pub fn init() -> &'static FormatRegistry {
    FormatRegistry::global()
}

/// Decodes an image file as linear float RGBA.
///
/// # Errors
///
/// Missing files, unrecognized formats and corrupt data all fail.
pub fn decode_float<P: AsRef<Path>>(path: P) -> IoResult<HdrImage> {
    init().decode_float(path.as_ref())
}

/// Decodes an image file as RGBA bytes.
pub fn decode_bytes<P: AsRef<Path>>(path: P) -> IoResult<LdrImage> {
    init().decode_bytes(path.as_ref())
}

/// Encodes float pixels; the extension must name a float format.
pub fn encode_float<P: AsRef<Path>>(path: P, image: &HdrImage) -> IoResult<()> {
    init().encode_float(path.as_ref(), image)
}

/// Encodes byte pixels; the extension must name a byte format.
pub fn encode_bytes<P: AsRef<Path>>(path: P, image: &LdrImage) -> IoResult<()> {
    init().encode_bytes(path.as_ref(), image)
}
