//! Format registry.
//!
//! Maps each [`Format`] to the functions that read and write it. The
//! global instance is built once on first use; [`crate::init`] forces that
//! and is safe to call any number of times.
//!
//! # Example
//!
//! ```
//! use tonekit_io::registry::FormatRegistry;
//!
//! let registry = FormatRegistry::global();
//! assert!(registry.supports_extension("hdr"));
//! assert!(registry.supports_extension("PNG"));
//! assert!(!registry.supports_extension("exr"));
//! ```

use crate::detect::Format;
use crate::{IoError, IoResult};
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;
use tonekit_core::{HdrImage, LdrImage};
use tracing::debug;

/// Format information entry in the registry.
#[derive(Clone)]
pub struct FormatInfo {
    /// Format this entry handles.
    pub format: Format,
    /// Human-readable format name.
    pub name: &'static str,
    /// File extensions without dots.
    pub extensions: &'static [&'static str],
    /// Reads a file as linear float RGBA.
    pub read_float: fn(&Path) -> IoResult<HdrImage>,
    /// Reads a file as RGBA bytes.
    pub read_bytes: fn(&Path) -> IoResult<LdrImage>,
    /// Writes float pixels (None if the format stores bytes only).
    pub write_float: Option<fn(&Path, &HdrImage) -> IoResult<()>>,
    /// Writes byte pixels (None if the format stores floats only).
    pub write_bytes: Option<fn(&Path, &LdrImage) -> IoResult<()>>,
}

impl std::fmt::Debug for FormatInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatInfo")
            .field("format", &self.format)
            .field("name", &self.name)
            .field("extensions", &self.extensions)
            .field("write_float", &self.write_float.is_some())
            .field("write_bytes", &self.write_bytes.is_some())
            .finish()
    }
}

/// Registry of image format handlers.
#[derive(Debug, Default)]
pub struct FormatRegistry {
    formats: HashMap<Format, FormatInfo>,
}

impl FormatRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the global registry with built-in formats.
    pub fn global() -> &'static FormatRegistry {
        static INSTANCE: OnceLock<FormatRegistry> = OnceLock::new();
        INSTANCE.get_or_init(|| {
            let mut registry = FormatRegistry::new();
            registry.register_builtin_formats();
            debug!(formats = registry.formats.len(), "format registry initialized");
            registry
        })
    }

    fn register_builtin_formats(&mut self) {
        self.register(FormatInfo {
            format: Format::Hdr,
            name: "Radiance HDR",
            extensions: &["hdr", "pic", "rgbe"],
            read_float: |p| crate::hdr::read_float(p),
            read_bytes: |p| crate::hdr::read_bytes(p),
            write_float: Some(|p, i| crate::hdr::write_float(p, i)),
            write_bytes: None,
        });

        self.register(FormatInfo {
            format: Format::Png,
            name: "PNG",
            extensions: &["png"],
            read_float: |p| crate::png::read_float(p),
            read_bytes: |p| crate::png::read_bytes(p),
            write_float: None,
            write_bytes: Some(|p, i| crate::png::write_bytes(p, i)),
        });
    }

    /// Registers a format, replacing any previous entry for it.
    pub fn register(&mut self, info: FormatInfo) {
        self.formats.insert(info.format, info);
    }

    /// Returns an iterator over registered format names.
    pub fn format_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.formats.values().map(|info| info.name)
    }

    /// Returns format info for a detected format.
    pub fn get(&self, format: Format) -> Option<&FormatInfo> {
        self.formats.get(&format)
    }

    /// Checks if an extension is supported.
    pub fn supports_extension(&self, ext: &str) -> bool {
        let ext = ext.to_lowercase();
        self.formats
            .values()
            .any(|info| info.extensions.contains(&ext.as_str()))
    }

    /// Resolves the handler for reading `path` (magic bytes, then extension).
    pub fn for_reading(&self, path: &Path) -> IoResult<&FormatInfo> {
        let format = Format::detect(path)?;
        self.lookup(format, path)
    }

    /// Resolves the handler for writing `path` (extension only).
    pub fn for_writing(&self, path: &Path) -> IoResult<&FormatInfo> {
        self.lookup(Format::from_extension(path), path)
    }

    fn lookup(&self, format: Format, path: &Path) -> IoResult<&FormatInfo> {
        self.get(format).ok_or_else(|| {
            IoError::UnsupportedFormat(format!("{}: unrecognized image format", path.display()))
        })
    }
}
