//! RGBA pixel types.
//!
//! - [`Rgba`] - four-channel pixel, generic over the channel type
//! - [`FloatPixel`] - `Rgba<f32>`, unclamped HDR values
//! - [`BytePixel`] - `Rgba<u8>`, 8-bit LDR values representing `[0, 1]`
//!
//! # Memory Layout
//!
//! `Rgba` is `#[repr(C)]`, so a slice of pixels has the same layout as an
//! interleaved `[R G B A R G B A ...]` channel buffer.
//!
//! ```
//! use tonekit_core::{BytePixel, FloatPixel};
//!
//! let ldr = BytePixel::new(255, 128, 64, 255);
//! let hdr = FloatPixel::new(4.0, 0.5, 0.25, 1.0);
//! assert_eq!(ldr.to_array(), [255, 128, 64, 255]);
//! assert!(hdr.r > 1.0);
//! ```

use crate::math::{byte_to_unit, truncate_to_byte};
use std::fmt;

/// Four-channel pixel with red, green, blue and alpha.
#[derive(Clone, Copy, PartialEq, Default)]
#[repr(C)]
pub struct Rgba<T> {
    /// Red channel
    pub r: T,
    /// Green channel
    pub g: T,
    /// Blue channel
    pub b: T,
    /// Alpha channel
    pub a: T,
}

/// HDR pixel with unclamped float channels.
pub type FloatPixel = Rgba<f32>;

/// LDR pixel with 8-bit channels.
pub type BytePixel = Rgba<u8>;

impl<T: Copy> Rgba<T> {
    /// Creates a pixel from channel values.
    #[inline]
    pub const fn new(r: T, g: T, b: T, a: T) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a pixel with all four channels set to `v`.
    #[inline]
    pub const fn splat(v: T) -> Self {
        Self::new(v, v, v, v)
    }

    /// Returns channels as `[r, g, b, a]`.
    #[inline]
    pub fn to_array(self) -> [T; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Creates a pixel from `[r, g, b, a]`.
    #[inline]
    pub fn from_array(arr: [T; 4]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3])
    }

    /// Applies `f` to R, G and B. Alpha is left untouched.
    #[inline]
    pub fn map_rgb<F: Fn(T) -> T>(self, f: F) -> Self {
        Self::new(f(self.r), f(self.g), f(self.b), self.a)
    }

    /// Applies `f` to every channel, alpha included.
    #[inline]
    pub fn map<U: Copy, F: Fn(T) -> U>(self, f: F) -> Rgba<U> {
        Rgba::new(f(self.r), f(self.g), f(self.b), f(self.a))
    }
}

impl FloatPixel {
    /// Transparent black.
    pub const TRANSPARENT: Self = Self::splat(0.0);

    /// Scales every channel by 255 and truncates to a byte.
    ///
    /// The cast saturates: channels above 1 become 255, negatives become 0.
    #[inline]
    pub fn to_bytes_truncated(self) -> BytePixel {
        self.map(truncate_to_byte)
    }
}

impl BytePixel {
    /// Transparent black.
    pub const TRANSPARENT: Self = Self::splat(0);

    /// Normalizes every channel to `[0, 1]`.
    #[inline]
    pub fn to_unit(self) -> FloatPixel {
        self.map(byte_to_unit)
    }

    /// Returns `true` if alpha is 255.
    #[inline]
    pub fn is_opaque(self) -> bool {
        self.a == u8::MAX
    }
}

impl<T: fmt::Debug> fmt::Debug for Rgba<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rgba({:?}, {:?}, {:?}, {:?})",
            self.r, self.g, self.b, self.a
        )
    }
}

impl<T: fmt::Display> fmt::Display for Rgba<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl<T: Copy> From<[T; 4]> for Rgba<T> {
    #[inline]
    fn from(arr: [T; 4]) -> Self {
        Self::from_array(arr)
    }
}

impl<T: Copy> From<Rgba<T>> for [T; 4] {
    #[inline]
    fn from(px: Rgba<T>) -> Self {
        px.to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        assert_eq!(std::mem::size_of::<BytePixel>(), 4);
        assert_eq!(std::mem::size_of::<FloatPixel>(), 16);
    }

    #[test]
    fn test_map_rgb_keeps_alpha() {
        let px = FloatPixel::new(0.5, 0.25, 1.0, 0.5).map_rgb(|c| c * 2.0);
        assert_eq!(px, FloatPixel::new(1.0, 0.5, 2.0, 0.5));
    }

    #[test]
    fn test_to_unit() {
        let px = BytePixel::new(0, 51, 255, 255).to_unit();
        assert_eq!(px.r, 0.0);
        assert!((px.g - 0.2).abs() < 1e-6);
        assert_eq!(px.b, 1.0);
        assert_eq!(px.a, 1.0);
    }

    #[test]
    fn test_to_bytes_truncated() {
        let px = FloatPixel::new(1.0, 0.5, 0.25, 7.0).to_bytes_truncated();
        assert_eq!(px, BytePixel::new(255, 127, 63, 255));
    }

    #[test]
    fn test_default_is_transparent() {
        assert_eq!(BytePixel::default(), BytePixel::TRANSPARENT);
        assert_eq!(FloatPixel::default(), FloatPixel::TRANSPARENT);
        assert!(!BytePixel::TRANSPARENT.is_opaque());
    }

    #[test]
    fn test_array_conversions() {
        let px: BytePixel = [1, 2, 3, 4].into();
        let arr: [u8; 4] = px.into();
        assert_eq!(arr, [1, 2, 3, 4]);
    }
}
