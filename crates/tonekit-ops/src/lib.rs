//! # tonekit-ops
//!
//! Image operations between the HDR and LDR representations.
//!
//! # Modules
//!
//! - [`tonemap`] - HDR float image to LDR byte image
//! - [`compose`] - stack of LDR layers to one LDR image ("over")
//!
//! Both operations are pure: they borrow their inputs and return a new
//! buffer. Pixels are processed independently, in parallel when the
//! `parallel` feature is enabled.
//!
//! # Example
//!
//! ```rust
//! use tonekit_core::{ColorSpace, FloatPixel, HdrImage};
//! use tonekit_ops::{compose, tonemap, ComposeParams, TonemapParams};
//!
//! let hdr = HdrImage::filled(2, 2, FloatPixel::new(1.0, 0.5, 0.25, 1.0));
//! let params = TonemapParams::default().with_color_space(ColorSpace::Linear);
//! let ldr = tonemap(&hdr, &params);
//! assert_eq!(ldr[0].to_array(), [255, 127, 63, 255]);
//!
//! let flat = compose(&[ldr.clone(), ldr], &ComposeParams::default()).unwrap();
//! assert_eq!(flat.dimensions(), (2, 2));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod compose;
pub mod tonemap;

pub use compose::{compose, compose_pixel, ComposeParams};
pub use error::{OpsError, OpsResult};
pub use tonemap::{tonemap, tonemap_pixel, TonemapParams};
