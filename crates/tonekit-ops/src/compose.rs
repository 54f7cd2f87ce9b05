//! Layer compositing with the Porter-Duff "over" operator.
//!
//! Layers are applied in slice order onto an accumulator that starts as
//! transparent black. Each pass, per pixel:
//!
//! 1. normalize the layer pixel ("above") and accumulator pixel ("below")
//!    to `[0, 1]`
//! 2. if sRGB, linearize RGB of both with [`decode_gamma`]
//! 3. if the layers are straight alpha, premultiply "above"
//! 4. `out = above + below * (1 - above.a)` on all four channels
//! 5. if sRGB, re-encode RGB with [`encode_gamma`]
//! 6. `* 255`, truncated, stored back into the accumulator
//!
//! The accumulator is always taken as premultiplied, whatever the
//! `premultiplied` flag says. Only the incoming layer is conditionally
//! premultiplied.
//!
//! # Example
//!
//! ```rust
//! use tonekit_core::{BytePixel, ColorSpace, LdrImage};
//! use tonekit_ops::compose::{compose, ComposeParams};
//!
//! let red = LdrImage::filled(1, 1, BytePixel::new(255, 0, 0, 255));
//! let blue = LdrImage::filled(1, 1, BytePixel::new(0, 0, 255, 255));
//! let params = ComposeParams::default().with_color_space(ColorSpace::Linear);
//!
//! let out = compose(&[red, blue], &params).unwrap();
//! assert_eq!(out[0], BytePixel::new(0, 0, 255, 255));
//! ```

use crate::{OpsError, OpsResult};
use tonekit_core::math::{decode_gamma, encode_gamma, over, premultiply};
use tonekit_core::{BytePixel, ColorSpace, LdrImage};
use tracing::{debug, trace};

/// Compositing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComposeParams {
    /// Layers already carry premultiplied RGB.
    pub premultiplied: bool,
    /// Encoding of layer and output bytes.
    pub color_space: ColorSpace,
}

impl ComposeParams {
    /// Marks the input layers as premultiplied (or straight).
    pub fn with_premultiplied(mut self, premultiplied: bool) -> Self {
        self.premultiplied = premultiplied;
        self
    }

    /// Sets the color space of the layers and the output.
    pub fn with_color_space(mut self, color_space: ColorSpace) -> Self {
        self.color_space = color_space;
        self
    }
}

/// Flattens `layers` bottom to top into one image.
///
/// Returns a 0x0 image for an empty slice. Otherwise the output has the
/// size of `layers[0]`.
///
/// # Errors
///
/// Returns [`OpsError::SizeMismatch`] before any blending if a layer's
/// size differs from the first layer's.
pub fn compose(layers: &[LdrImage], params: &ComposeParams) -> OpsResult<LdrImage> {
    let Some(first) = layers.first() else {
        debug!("compose: no layers");
        return Ok(LdrImage::empty());
    };

    let (width, height) = first.dimensions();
    for (index, layer) in layers.iter().enumerate().skip(1) {
        if !layer.same_size(first) {
            return Err(OpsError::SizeMismatch(format!(
                "layer {} is {}x{}, expected {}x{}",
                index,
                layer.width(),
                layer.height(),
                width,
                height
            )));
        }
    }

    debug!(
        layers = layers.len(),
        width,
        height,
        premultiplied = params.premultiplied,
        color_space = %params.color_space,
        "compose"
    );

    let params = *params;
    let mut acc = LdrImage::new(width, height);
    for (index, layer) in layers.iter().enumerate() {
        trace!(index, "compose layer");
        acc = layer.zip_map(&acc, move |above, below| compose_pixel(above, below, &params))?;
    }
    Ok(acc)
}

/// Composites one layer pixel over one accumulator pixel.
#[inline]
pub fn compose_pixel(above: BytePixel, below: BytePixel, params: &ComposeParams) -> BytePixel {
    let srgb = params.color_space.is_srgb();

    let mut above = above.to_unit();
    let mut below = below.to_unit();

    if srgb {
        above = above.map_rgb(decode_gamma);
        below = below.map_rgb(decode_gamma);
    }

    if !params.premultiplied {
        above = premultiply(above);
    }

    let mut out = over(above, below);

    if srgb {
        out = out.map_rgb(encode_gamma);
    }

    out.to_bytes_truncated()
}
