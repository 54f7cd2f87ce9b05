//! # tonekit-core
//!
//! Core types for HDR tonemapping and LDR compositing.
//!
//! - [`ImageBuffer`] - owned row-major pixel grid, with [`HdrImage`] and
//!   [`LdrImage`] aliases
//! - [`Rgba`], [`FloatPixel`], [`BytePixel`] - four-channel pixels
//! - [`ColorSpace`] - linear vs gamma-encoded toggle
//! - [`math`] - filmic curve, byte/unit conversion, gamma 2.2 helpers
//!
//! ## Crate Structure
//!
//! ```text
//! tonekit-core (this crate)
//!    ^
//!    |
//!    +-- tonekit-ops (tonemap, compose)
//!    +-- tonekit-io  (Radiance HDR and PNG codecs)
//!    +-- tonekit-cli (driver)
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel` - per-pixel maps run on rayon (enabled by default)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod colorspace;
pub mod error;
pub mod image;
pub mod math;
pub mod pixel;

pub use colorspace::ColorSpace;
pub use error::{Error, Result};
pub use image::{HdrImage, ImageBuffer, LdrImage};
pub use pixel::{BytePixel, FloatPixel, Rgba};

/// Prelude module for convenient imports.
///
/// ```
/// use tonekit_core::prelude::*;
///
/// let img = LdrImage::new(1, 1);
/// assert_eq!(img[0], BytePixel::TRANSPARENT);
/// ```
pub mod prelude {
    pub use crate::colorspace::ColorSpace;
    pub use crate::error::{Error, Result};
    pub use crate::image::{HdrImage, ImageBuffer, LdrImage};
    pub use crate::math::{
        byte_to_unit, decode_gamma, encode_gamma, filmic, unit_to_byte,
    };
    pub use crate::pixel::{BytePixel, FloatPixel, Rgba};
}
