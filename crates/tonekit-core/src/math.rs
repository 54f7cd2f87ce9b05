//! Scalar pixel math: filmic curve, byte/unit conversion, gamma 2.2.
//!
//! Every function here is total over its input type. Out-of-range values are
//! clamped (or passed through, for the curves) and never reported as errors.
//!
//! # Gamma
//!
//! Encoding and decoding use a pure power law with exponent 2.2, not the
//! piecewise sRGB curve:
//!
//! ```text
//! encode: V = L^(1/2.2)
//! decode: L = V^2.2
//! ```
//!
//! # Example
//!
//! ```rust
//! use tonekit_core::math::{decode_gamma, encode_gamma};
//!
//! let encoded = encode_gamma(0.218);
//! assert!((encoded - 0.5).abs() < 0.01);
//! assert!((decode_gamma(encoded) - 0.218).abs() < 1e-5);
//! ```

use crate::pixel::FloatPixel;

/// Display gamma exponent.
pub const GAMMA: f32 = 2.2;

/// Inverse display gamma, `1 / 2.2`.
pub const INV_GAMMA: f32 = 1.0 / GAMMA;

/// Largest byte channel value as a float.
pub const BYTE_MAX: f32 = 255.0;

/// Filmic tone curve.
///
/// ```text
/// (2.51x² + 0.03x) / (2.43x² + 0.59x + 0.14)
/// ```
///
/// The denominator has no real roots, so the curve is defined for every
/// finite input. The result is not clamped; very large inputs approach
/// `2.51 / 2.43` and negative inputs may go below zero.
///
/// # Example
///
/// ```rust
/// use tonekit_core::math::filmic;
///
/// assert_eq!(filmic(0.0), 0.0);
/// assert!(filmic(1.0) > 0.75 && filmic(1.0) < 0.85);
/// ```
#[inline]
pub fn filmic(x: f32) -> f32 {
    let num = 2.51 * x * x + 0.03 * x;
    let den = 2.43 * x * x + 0.59 * x + 0.14;
    num / den
}

/// Normalizes a byte channel to `[0, 1]`: `b / 255`.
#[inline]
pub fn byte_to_unit(b: u8) -> f32 {
    b as f32 / BYTE_MAX
}

/// Converts a unit value to a byte, rounding to nearest.
///
/// The input is clamped to `[0, 1]` before scaling so the product can never
/// leave the byte range. NaN maps to 0.
///
/// # Example
///
/// ```rust
/// use tonekit_core::math::unit_to_byte;
///
/// assert_eq!(unit_to_byte(-3.0), 0);
/// assert_eq!(unit_to_byte(0.5), 128);
/// assert_eq!(unit_to_byte(7.5), 255);
/// ```
#[inline]
pub fn unit_to_byte(f: f32) -> u8 {
    (BYTE_MAX * f.clamp(0.0, 1.0)).round() as u8
}

/// Scales a unit value by 255 and truncates toward zero.
///
/// This is the plain float-to-integer cast used when tonemapping and
/// compositing write their output. No clamping happens first; the cast
/// saturates, so values above 1 land on 255 and negatives or NaN on 0.
#[inline]
pub fn truncate_to_byte(f: f32) -> u8 {
    (BYTE_MAX * f) as u8
}

/// Gamma-encodes a linear value: `f^(1/2.2)`.
///
/// Non-positive inputs return 0.
#[inline]
pub fn encode_gamma(f: f32) -> f32 {
    if f <= 0.0 { 0.0 } else { f.powf(INV_GAMMA) }
}

/// Linearizes a gamma-encoded value: `f^2.2`.
///
/// Non-positive inputs return 0.
#[inline]
pub fn decode_gamma(f: f32) -> f32 {
    if f <= 0.0 { 0.0 } else { f.powf(GAMMA) }
}

/// Multiplier for an exposure adjustment in stops: `2^stops`.
#[inline]
pub fn exposure_scale(stops: f32) -> f32 {
    2.0_f32.powf(stops)
}

/// Premultiplies RGB by alpha.
#[inline]
pub fn premultiply(px: FloatPixel) -> FloatPixel {
    let a = px.a;
    px.map_rgb(|c| c * a)
}

/// Porter-Duff "over" for premultiplied pixels.
///
/// `above + below * (1 - above.a)`, applied to all four channels, alpha
/// included.
#[inline]
pub fn over(above: FloatPixel, below: FloatPixel) -> FloatPixel {
    let k = 1.0 - above.a;
    FloatPixel::new(
        above.r + below.r * k,
        above.g + below.g * k,
        above.b + below.b * k,
        above.a + below.a * k,
    )
}
