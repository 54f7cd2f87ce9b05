//! The codec boundary used by the tonemap and compose drivers.

use crate::registry::FormatRegistry;
use crate::{IoError, IoResult};
use std::path::Path;
use tonekit_core::{HdrImage, LdrImage};
use tracing::debug;

/// Loads and stores images in the two pixel representations.
///
/// Implementations report every failure as an error; none substitutes a
/// default image.
pub trait ImageCodec {
    /// Decodes a file as linear float RGBA.
    fn decode_float(&self, path: &Path) -> IoResult<HdrImage>;

    /// Decodes a file as RGBA bytes.
    fn decode_bytes(&self, path: &Path) -> IoResult<LdrImage>;

    /// Encodes float pixels to a file chosen by its extension.
    fn encode_float(&self, path: &Path, image: &HdrImage) -> IoResult<()>;

    /// Encodes byte pixels to a file chosen by its extension.
    fn encode_bytes(&self, path: &Path, image: &LdrImage) -> IoResult<()>;
}

impl ImageCodec for FormatRegistry {
    fn decode_float(&self, path: &Path) -> IoResult<HdrImage> {
        let info = self.for_reading(path)?;
        let image = (info.read_float)(path)?;
        debug!(
            path = %path.display(),
            format = info.name,
            width = image.width(),
            height = image.height(),
            "decoded float image"
        );
        Ok(image)
    }

    fn decode_bytes(&self, path: &Path) -> IoResult<LdrImage> {
        let info = self.for_reading(path)?;
        let image = (info.read_bytes)(path)?;
        debug!(
            path = %path.display(),
            format = info.name,
            width = image.width(),
            height = image.height(),
            "decoded byte image"
        );
        Ok(image)
    }

    fn encode_float(&self, path: &Path, image: &HdrImage) -> IoResult<()> {
        let info = self.for_writing(path)?;
        let write = info.write_float.ok_or_else(|| {
            IoError::UnsupportedFormat(format!("{} cannot store float pixels", info.name))
        })?;
        write(path, image)?;
        debug!(path = %path.display(), format = info.name, "encoded float image");
        Ok(())
    }

    fn encode_bytes(&self, path: &Path, image: &LdrImage) -> IoResult<()> {
        let info = self.for_writing(path)?;
        let write = info.write_bytes.ok_or_else(|| {
            IoError::UnsupportedFormat(format!("{} cannot store 8-bit pixels", info.name))
        })?;
        write(path, image)?;
        debug!(path = %path.display(), format = info.name, "encoded byte image");
        Ok(())
    }
}
