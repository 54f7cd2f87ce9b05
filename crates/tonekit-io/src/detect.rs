//! Format detection utilities.
//!
//! Detects image formats from magic bytes, falling back to the file
//! extension.

use crate::IoResult;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const HDR_MAGIC: &[u8] = b"#?";

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Radiance HDR (RGBE).
    Hdr,
    /// PNG.
    Png,
    /// Unknown/unsupported format.
    Unknown,
}

impl Format {
    /// Detects format from file path (magic bytes, then extension).
    pub fn detect<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        let path = path.as_ref();
        let mut header = [0u8; 8];
        let mut file = File::open(path)?;
        let n = read_up_to(&mut file, &mut header)?;

        match Self::from_magic(&header[..n]) {
            Format::Unknown => Ok(Self::from_extension(path)),
            format => Ok(format),
        }
    }

    /// Detects format from file extension only.
    pub fn from_extension<P: AsRef<Path>>(path: P) -> Self {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("hdr") | Some("pic") | Some("rgbe") => Format::Hdr,
            Some("png") => Format::Png,
            _ => Format::Unknown,
        }
    }

    /// Detects format from leading file bytes.
    pub fn from_magic(header: &[u8]) -> Self {
        if header.starts_with(&PNG_MAGIC) {
            Format::Png
        } else if header.starts_with(HDR_MAGIC) {
            Format::Hdr
        } else {
            Format::Unknown
        }
    }
}

fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> IoResult<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(Format::from_extension("a.hdr"), Format::Hdr);
        assert_eq!(Format::from_extension("a.HDR"), Format::Hdr);
        assert_eq!(Format::from_extension("dir/a.pic"), Format::Hdr);
        assert_eq!(Format::from_extension("a.png"), Format::Png);
        assert_eq!(Format::from_extension("a.jpg"), Format::Unknown);
        assert_eq!(Format::from_extension("noext"), Format::Unknown);
    }

    #[test]
    fn test_from_magic() {
        assert_eq!(Format::from_magic(&PNG_MAGIC), Format::Png);
        assert_eq!(Format::from_magic(b"#?RADIANCE\n"), Format::Hdr);
        assert_eq!(Format::from_magic(b"#?"), Format::Hdr);
        assert_eq!(Format::from_magic(b"GIF89a"), Format::Unknown);
        assert_eq!(Format::from_magic(&[]), Format::Unknown);
    }
}
