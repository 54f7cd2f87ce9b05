//! Working/output color space toggle.
//!
//! tonekit only distinguishes two encodings: linear values, and values
//! encoded with a 2.2 display gamma (called sRGB here, as it is on the
//! command line). No primaries conversion happens anywhere.

use crate::Error;
use std::fmt;
use std::str::FromStr;

/// Color encoding of byte images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorSpace {
    /// Values are stored linearly.
    Linear,
    /// Values are stored with gamma 2.2 encoding.
    #[default]
    Srgb,
}

impl ColorSpace {
    /// Maps the `--no-srgb` style flag onto a color space.
    #[inline]
    pub fn from_no_srgb(no_srgb: bool) -> Self {
        if no_srgb { Self::Linear } else { Self::Srgb }
    }

    /// Returns `true` for [`ColorSpace::Srgb`].
    #[inline]
    pub fn is_srgb(self) -> bool {
        self == Self::Srgb
    }

    /// Lowercase identifier.
    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Srgb => "srgb",
        }
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorSpace {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" | "lin" => Ok(Self::Linear),
            "srgb" | "gamma" => Ok(Self::Srgb),
            _ => Err(Error::UnknownColorSpace(s.to_string())),
        }
    }
}
