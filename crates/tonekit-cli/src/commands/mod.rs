//! CLI command implementations

pub mod compose;
pub mod tonemap;

use anyhow::{Context, Result};
use std::path::Path;
use tonekit_core::{HdrImage, LdrImage};
use tonekit_io::ImageCodec;

/// Load image as linear float
pub fn load_hdr(codec: &dyn ImageCodec, path: &Path) -> Result<HdrImage> {
    codec
        .decode_float(path)
        .with_context(|| format!("Failed to load: {}", path.display()))
}

/// Load image as 8-bit RGBA
pub fn load_ldr(codec: &dyn ImageCodec, path: &Path) -> Result<LdrImage> {
    codec
        .decode_bytes(path)
        .with_context(|| format!("Failed to load: {}", path.display()))
}

/// Save 8-bit image to path
pub fn save_ldr(codec: &dyn ImageCodec, path: &Path, image: &LdrImage) -> Result<()> {
    codec
        .encode_bytes(path, image)
        .with_context(|| format!("Failed to save: {}", path.display()))
}
