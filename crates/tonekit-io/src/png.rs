//! PNG format support.
//!
//! Reads 8-bit and 16-bit grayscale, gray+alpha, RGB, RGBA and palette
//! images, always expanding to four channels. Writes 8-bit RGBA.
//!
//! # Example
//!
//! ```rust,ignore
//! use tonekit_io::png;
//!
//! let image = png::read_bytes("layer.png")?;
//! png::write_bytes("out.png", &image)?;
//! ```

use crate::{IoError, IoResult};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Cursor, Seek, Write};
use std::path::Path;
use tonekit_core::math::{byte_to_unit, decode_gamma};
use tonekit_core::{FloatPixel, HdrImage, LdrImage, Rgba};
use tracing::trace;

/// Raw samples as the decoder produced them.
enum Samples {
    Eight(Vec<u8>),
    Sixteen(Vec<u16>),
}

/// Decoded PNG before expansion to RGBA.
struct Decoded {
    width: u32,
    height: u32,
    channels: usize,
    samples: Samples,
}

/// Reads a PNG as RGBA bytes.
///
/// 16-bit samples keep their high byte. Missing alpha becomes 255.
pub fn read_bytes<P: AsRef<Path>>(path: P) -> IoResult<LdrImage> {
    let file = File::open(path.as_ref())?;
    to_ldr(decode(BufReader::new(file))?)
}

/// Reads a PNG as linear float RGBA.
///
/// Color samples are normalized and linearized with gamma 2.2; alpha is
/// only normalized.
pub fn read_float<P: AsRef<Path>>(path: P) -> IoResult<HdrImage> {
    let file = File::open(path.as_ref())?;
    to_hdr(decode(BufReader::new(file))?)
}

/// Decodes PNG bytes held in memory as RGBA bytes.
pub fn decode_memory(data: &[u8]) -> IoResult<LdrImage> {
    to_ldr(decode(Cursor::new(data))?)
}

/// Writes an image as an 8-bit RGBA PNG.
///
/// # Errors
///
/// Fails with [`IoError::EncodeError`] for a 0-sized image.
pub fn write_bytes<P: AsRef<Path>>(path: P, image: &LdrImage) -> IoResult<()> {
    check_encodable(image)?;
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    encode(&mut writer, image)?;
    writer.flush()?;
    Ok(())
}

/// Encodes an image as an 8-bit RGBA PNG stream.
pub fn encode<W: Write>(writer: W, image: &LdrImage) -> IoResult<()> {
    check_encodable(image)?;

    let mut encoder = png::Encoder::new(writer, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::default());

    let mut png_writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;

    let data: Vec<u8> = image.pixels().iter().flat_map(|px| px.to_array()).collect();
    png_writer
        .write_image_data(&data)
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    png_writer
        .finish()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;

    Ok(())
}

fn check_encodable(image: &LdrImage) -> IoResult<()> {
    if image.is_empty() {
        return Err(IoError::EncodeError(format!(
            "cannot write a {}x{} image as PNG",
            image.width(),
            image.height()
        )));
    }
    Ok(())
}

fn decode<R: BufRead + Seek>(reader: R) -> IoResult<Decoded> {
    let mut decoder = png::Decoder::new(reader);
    decoder.set_transformations(png::Transformations::EXPAND);
    let mut reader = decoder
        .read_info()
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;
    buf.truncate(info.buffer_size());

    let channels = match info.color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        other => {
            return Err(IoError::UnsupportedBitDepth(format!(
                "{:?} {:?}",
                other, info.bit_depth
            )));
        }
    };

    let samples = match info.bit_depth {
        png::BitDepth::Eight => Samples::Eight(buf),
        png::BitDepth::Sixteen => Samples::Sixteen(bytes_to_u16(&buf)),
        other => {
            return Err(IoError::UnsupportedBitDepth(format!(
                "{:?} {:?}",
                info.color_type, other
            )));
        }
    };

    trace!(
        width = info.width,
        height = info.height,
        channels,
        "PNG frame decoded"
    );

    Ok(Decoded {
        width: info.width,
        height: info.height,
        channels,
        samples,
    })
}

fn to_ldr(decoded: Decoded) -> IoResult<LdrImage> {
    let pixels = match &decoded.samples {
        Samples::Eight(data) => expand_rgba(data, decoded.channels, u8::MAX),
        Samples::Sixteen(data) => expand_rgba(data, decoded.channels, u16::MAX)
            .into_iter()
            .map(|px| px.map(|v| (v >> 8) as u8))
            .collect(),
    };
    Ok(LdrImage::from_pixels(decoded.width, decoded.height, pixels)?)
}

fn to_hdr(decoded: Decoded) -> IoResult<HdrImage> {
    let pixels: Vec<FloatPixel> = match &decoded.samples {
        Samples::Eight(data) => expand_rgba(data, decoded.channels, u8::MAX)
            .into_iter()
            .map(|px| linearize(px.map(byte_to_unit)))
            .collect(),
        Samples::Sixteen(data) => expand_rgba(data, decoded.channels, u16::MAX)
            .into_iter()
            .map(|px| linearize(px.map(|v| v as f32 / u16::MAX as f32)))
            .collect(),
    };
    Ok(HdrImage::from_pixels(decoded.width, decoded.height, pixels)?)
}

#[inline]
fn linearize(px: FloatPixel) -> FloatPixel {
    px.map_rgb(decode_gamma)
}

/// Expands interleaved 1-4 channel samples to RGBA.
fn expand_rgba<T: Copy>(samples: &[T], channels: usize, opaque: T) -> Vec<Rgba<T>> {
    samples
        .chunks_exact(channels)
        .map(|s| match channels {
            1 => Rgba::new(s[0], s[0], s[0], opaque),
            2 => Rgba::new(s[0], s[0], s[0], s[1]),
            3 => Rgba::new(s[0], s[1], s[2], opaque),
            _ => Rgba::new(s[0], s[1], s[2], s[3]),
        })
        .collect()
}

/// Converts big-endian byte slice to u16 vector.
fn bytes_to_u16(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks_exact(2)
        .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
        .collect()
}
