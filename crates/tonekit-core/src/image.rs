//! Owned image buffer.
//!
//! [`ImageBuffer<T>`] stores a rectangular grid of pixels in a single
//! `Vec<T>`, row-major, top-to-bottom:
//!
//! ```text
//! pixels: [p(0,0) p(1,0) ... p(w-1,0)]  <- Row 0
//!         [p(0,1) p(1,1) ... p(w-1,1)]  <- Row 1
//!         ...
//! ```
//!
//! The length of the pixel vector always equals `width * height`. Every
//! constructor enforces it and the fields are private. A 0x0 buffer is
//! valid and means "no image".
//!
//! # Usage
//!
//! ```rust
//! use tonekit_core::{BytePixel, LdrImage};
//!
//! let mut img = LdrImage::new(4, 2);
//! img.set(3, 1, BytePixel::new(255, 0, 0, 255)).unwrap();
//!
//! assert_eq!(img[(3, 1)], BytePixel::new(255, 0, 0, 255));
//! assert_eq!(img[7], BytePixel::new(255, 0, 0, 255));
//! assert!(img.get(4, 0).is_none());
//! ```
//!
//! Operations on buffers are pure maps producing a new buffer; see
//! [`ImageBuffer::map`] and [`ImageBuffer::zip_map`]. With the `parallel`
//! feature both run across pixels on the rayon thread pool.

use crate::pixel::{BytePixel, FloatPixel};
use crate::{Error, Result};
use std::ops::{Index, IndexMut};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Rectangular, row-major grid of pixels.
#[derive(Clone, PartialEq)]
pub struct ImageBuffer<T> {
    width: u32,
    height: u32,
    pixels: Vec<T>,
}

/// HDR image with float pixels.
pub type HdrImage = ImageBuffer<FloatPixel>;

/// LDR image with byte pixels.
pub type LdrImage = ImageBuffer<BytePixel>;

impl<T> ImageBuffer<T> {
    /// Creates a 0x0 buffer.
    #[inline]
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            pixels: Vec::new(),
        }
    }

    /// Creates a buffer from existing pixels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if `pixels.len() != width * height`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tonekit_core::{FloatPixel, HdrImage};
    ///
    /// let px = vec![FloatPixel::splat(1.0); 6];
    /// assert!(HdrImage::from_pixels(3, 2, px.clone()).is_ok());
    /// assert!(HdrImage::from_pixels(4, 2, px).is_err());
    /// ```
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<T>) -> Result<Self> {
        let expected = pixel_count(width, height)?;
        if pixels.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} pixels, got {}", expected, pixels.len()),
            ));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Returns the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the total number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    /// Returns `true` if the image has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Returns `true` if both buffers have the same width and height.
    #[inline]
    pub fn same_size<U>(&self, other: &ImageBuffer<U>) -> bool {
        self.dimensions() == other.dimensions()
    }

    /// Returns all pixels in row-major order.
    #[inline]
    pub fn pixels(&self) -> &[T] {
        &self.pixels
    }

    /// Returns all pixels mutably. The length cannot be changed through it.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [T] {
        &mut self.pixels
    }

    /// Consumes the buffer and returns its pixel storage.
    #[inline]
    pub fn into_pixels(self) -> Vec<T> {
        self.pixels
    }

    /// Linear offset of `(x, y)`, or `None` when out of bounds.
    #[inline]
    pub fn offset(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| y as usize * self.width as usize + x as usize)
    }

    /// Returns the pixel at `(x, y)`, or `None` when out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<&T> {
        self.offset(x, y).map(|i| &self.pixels[i])
    }

    /// Returns the pixel at `(x, y)` mutably, or `None` when out of bounds.
    #[inline]
    pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut T> {
        self.offset(x, y).map(move |i| &mut self.pixels[i])
    }

    /// Sets the pixel at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if `(x, y)` is outside the image.
    pub fn set(&mut self, x: u32, y: u32, pixel: T) -> Result<()> {
        let (w, h) = self.dimensions();
        let slot = self
            .get_mut(x, y)
            .ok_or_else(|| Error::out_of_bounds(x, y, w, h))?;
        *slot = pixel;
        Ok(())
    }

    /// Returns row `y`, or `None` when out of bounds.
    #[inline]
    pub fn row(&self, y: u32) -> Option<&[T]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.width as usize;
        Some(&self.pixels[start..start + self.width as usize])
    }

    /// Iterates rows top to bottom.
    ///
    /// Always yields `height` rows; a 0-wide buffer yields empty slices.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        let w = self.width as usize;
        (0..self.height as usize).map(move |y| &self.pixels[y * w..(y + 1) * w])
    }
}

impl<T: Copy + Default> ImageBuffer<T> {
    /// Creates a buffer filled with `T::default()`.
    ///
    /// For both pixel types the default is transparent black.
    ///
    /// # Panics
    ///
    /// Panics if `width * height` overflows `usize`.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, T::default())
    }

    /// Creates a buffer with every pixel set to `pixel`.
    ///
    /// # Panics
    ///
    /// Panics if `width * height` overflows `usize`.
    pub fn filled(width: u32, height: u32, pixel: T) -> Self {
        let count = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: vec![pixel; count],
        }
    }
}

impl<T: Copy + Send + Sync> ImageBuffer<T> {
    /// Maps every pixel through `f` into a new buffer of the same size.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tonekit_core::{BytePixel, LdrImage};
    ///
    /// let img = LdrImage::filled(2, 2, BytePixel::new(255, 0, 0, 255));
    /// let hdr = img.map(|px| px.to_unit());
    /// assert_eq!(hdr.dimensions(), (2, 2));
    /// assert_eq!(hdr[0].r, 1.0);
    /// ```
    pub fn map<U, F>(&self, f: F) -> ImageBuffer<U>
    where
        U: Send,
        F: Fn(T) -> U + Send + Sync,
    {
        #[cfg(feature = "parallel")]
        let pixels: Vec<U> = self.pixels.par_iter().map(|&px| f(px)).collect();
        #[cfg(not(feature = "parallel"))]
        let pixels: Vec<U> = self.pixels.iter().map(|&px| f(px)).collect();

        ImageBuffer {
            width: self.width,
            height: self.height,
            pixels,
        }
    }

    /// Combines two equally sized buffers pixel by pixel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the sizes differ.
    pub fn zip_map<V, U, F>(&self, other: &ImageBuffer<V>, f: F) -> Result<ImageBuffer<U>>
    where
        V: Copy + Send + Sync,
        U: Send,
        F: Fn(T, V) -> U + Send + Sync,
    {
        if !self.same_size(other) {
            return Err(Error::dimension_mismatch(
                self.dimensions(),
                other.dimensions(),
            ));
        }

        #[cfg(feature = "parallel")]
        let pixels: Vec<U> = self
            .pixels
            .par_iter()
            .zip(other.pixels.par_iter())
            .map(|(&a, &b)| f(a, b))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let pixels: Vec<U> = self
            .pixels
            .iter()
            .zip(other.pixels.iter())
            .map(|(&a, &b)| f(a, b))
            .collect();

        Ok(ImageBuffer {
            width: self.width,
            height: self.height,
            pixels,
        })
    }
}

impl<T> Default for ImageBuffer<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Index<usize> for ImageBuffer<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        &self.pixels[index]
    }
}

impl<T> IndexMut<usize> for ImageBuffer<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.pixels[index]
    }
}

impl<T> Index<(u32, u32)> for ImageBuffer<T> {
    type Output = T;

    /// Indexes by `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    #[inline]
    fn index(&self, (x, y): (u32, u32)) -> &T {
        match self.get(x, y) {
            Some(px) => px,
            None => panic!(
                "pixel ({}, {}) out of bounds for image {}x{}",
                x, y, self.width, self.height
            ),
        }
    }
}

impl<T> IndexMut<(u32, u32)> for ImageBuffer<T> {
    #[inline]
    fn index_mut(&mut self, (x, y): (u32, u32)) -> &mut T {
        let (w, h) = self.dimensions();
        match self.get_mut(x, y) {
            Some(px) => px,
            None => panic!("pixel ({}, {}) out of bounds for image {}x{}", x, y, w, h),
        }
    }
}

impl<T> std::fmt::Debug for ImageBuffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &std::any::type_name::<T>())
            .finish()
    }
}

fn pixel_count(width: u32, height: u32) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| Error::invalid_dimensions(width, height, "pixel count overflows"))
}
