//! HDR to LDR tonemapping.
//!
//! Per pixel, RGB goes through:
//!
//! 1. exposure: `c * 2^exposure`
//! 2. optional filmic curve ([`filmic`])
//! 3. optional gamma encoding ([`encode_gamma`]) when the output is sRGB
//! 4. clamp to `[0, 1]`
//! 5. `* 255`, truncated
//!
//! Alpha skips steps 1-4 and is only scaled and truncated. It is not
//! clamped first; the saturating cast pins out-of-range alpha to 0 or 255.
//!
//! # Example
//!
//! ```rust
//! use tonekit_core::{ColorSpace, FloatPixel};
//! use tonekit_ops::tonemap::{tonemap_pixel, TonemapParams};
//!
//! let params = TonemapParams::default()
//!     .with_exposure(-1.0)
//!     .with_color_space(ColorSpace::Linear);
//! let px = tonemap_pixel(FloatPixel::new(2.0, 1.0, 0.5, 1.0), &params);
//! assert_eq!(px.to_array(), [255, 127, 63, 255]);
//! ```

use tonekit_core::math::{encode_gamma, exposure_scale, filmic, truncate_to_byte};
use tonekit_core::{BytePixel, ColorSpace, FloatPixel, HdrImage, LdrImage};
use tracing::{debug, trace};

/// Tonemapping parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TonemapParams {
    /// Exposure in stops (0 = no change, +1 = 2x brighter).
    pub exposure: f32,
    /// Apply the filmic curve after exposure.
    pub filmic: bool,
    /// Output encoding. `Srgb` gamma-encodes RGB before quantizing.
    pub color_space: ColorSpace,
}

impl Default for TonemapParams {
    fn default() -> Self {
        Self {
            exposure: 0.0,
            filmic: false,
            color_space: ColorSpace::Srgb,
        }
    }
}

impl TonemapParams {
    /// Sets exposure in stops.
    pub fn with_exposure(mut self, exposure: f32) -> Self {
        self.exposure = exposure;
        self
    }

    /// Enables or disables the filmic curve.
    pub fn with_filmic(mut self, filmic: bool) -> Self {
        self.filmic = filmic;
        self
    }

    /// Sets the output color space.
    pub fn with_color_space(mut self, color_space: ColorSpace) -> Self {
        self.color_space = color_space;
        self
    }
}

/// Tonemaps an HDR image into a new LDR image of the same size.
///
/// Total for any finite input, including the 0x0 image.
pub fn tonemap(hdr: &HdrImage, params: &TonemapParams) -> LdrImage {
    let (width, height) = hdr.dimensions();
    debug!(
        width,
        height,
        exposure = params.exposure,
        filmic = params.filmic,
        color_space = %params.color_space,
        "tonemap"
    );

    let scale = exposure_scale(params.exposure);
    let use_filmic = params.filmic;
    let srgb = params.color_space.is_srgb();
    trace!(scale, "exposure multiplier");

    hdr.map(move |px| map_pixel(px, scale, use_filmic, srgb))
}

/// Tonemaps a single pixel.
#[inline]
pub fn tonemap_pixel(px: FloatPixel, params: &TonemapParams) -> BytePixel {
    map_pixel(
        px,
        exposure_scale(params.exposure),
        params.filmic,
        params.color_space.is_srgb(),
    )
}

#[inline]
fn map_pixel(px: FloatPixel, scale: f32, use_filmic: bool, srgb: bool) -> BytePixel {
    let mut rgb = px.map_rgb(|c| c * scale);
    if use_filmic {
        rgb = rgb.map_rgb(filmic);
    }
    if srgb {
        rgb = rgb.map_rgb(encode_gamma);
    }
    let rgb = rgb.map_rgb(|c| c.clamp(0.0, 1.0));

    BytePixel::new(
        truncate_to_byte(rgb.r),
        truncate_to_byte(rgb.g),
        truncate_to_byte(rgb.b),
        truncate_to_byte(px.a),
    )
}
