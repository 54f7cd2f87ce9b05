//! Radiance HDR (RGBE) format support.
//!
//! Reads flat and RLE scanlines, writes RLE whenever the width allows it.
//! Decoded pixels are linear float RGB with alpha 1.0. Alpha is dropped on
//! write since RGBE has no channel for it.

use crate::{IoError, IoResult};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;
use tonekit_core::math::{encode_gamma, unit_to_byte};
use tonekit_core::{BytePixel, FloatPixel, HdrImage, LdrImage};
use tracing::{debug, warn};

const HDR_MAGIC: &str = "#?";
const FORMAT_RGBE: &str = "32-bit_rle_rgbe";
const RLE_MIN_WIDTH: usize = 8;
const RLE_MAX_WIDTH: usize = 0x7fff;
/// Largest pixel count accepted from a header (16384 x 16384).
const MAX_PIXELS: u64 = 1 << 28;

/// Parsed header fields needed to decode the pixel block.
#[derive(Debug)]
struct Header {
    width: u32,
    height: u32,
    format: String,
}

/// Reads an HDR file as linear float RGBA.
pub fn read_float<P: AsRef<Path>>(path: P) -> IoResult<HdrImage> {
    let file = File::open(path)?;
    decode(&mut BufReader::new(file))
}

/// Reads an HDR file as gamma-encoded bytes with opaque alpha.
pub fn read_bytes<P: AsRef<Path>>(path: P) -> IoResult<LdrImage> {
    Ok(to_ldr(&read_float(path)?))
}

/// Writes an image as an HDR file.
///
/// # Errors
///
/// Fails with [`IoError::EncodeError`] for a 0-sized image.
pub fn write_float<P: AsRef<Path>>(path: P, image: &HdrImage) -> IoResult<()> {
    check_encodable(image)?;
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    encode(&mut writer, image)?;
    writer.flush()?;
    Ok(())
}

/// Decodes an HDR stream.
pub fn decode<R: BufRead>(reader: &mut R) -> IoResult<HdrImage> {
    let header = read_header(reader)?;
    if header.format.to_lowercase().contains("xyze") {
        warn!(format = %header.format, "XYZE data is read as RGB");
    }
    debug!(width = header.width, height = header.height, "HDR header");

    let rgbe = read_pixels(reader, header.width as usize, header.height as usize)?;
    let pixels = rgbe
        .chunks_exact(4)
        .map(|c| {
            let (r, g, b) = rgbe_to_f32(c[0], c[1], c[2], c[3]);
            FloatPixel::new(r, g, b, 1.0)
        })
        .collect();

    Ok(HdrImage::from_pixels(header.width, header.height, pixels)?)
}

/// Decodes an HDR file held in memory.
pub fn decode_memory(data: &[u8]) -> IoResult<HdrImage> {
    let mut reader = data;
    decode(&mut reader)
}

/// Encodes an image as an HDR stream.
pub fn encode<W: Write>(writer: &mut W, image: &HdrImage) -> IoResult<()> {
    check_encodable(image)?;

    writeln!(writer, "{}RADIANCE", HDR_MAGIC)?;
    writeln!(writer, "FORMAT={}", FORMAT_RGBE)?;
    writeln!(writer)?;
    writeln!(writer, "-Y {} +X {}", image.height(), image.width())?;

    write_pixels(writer, image)
}

/// Converts linear HDR pixels to gamma-encoded bytes.
///
/// RGB is gamma encoded, clamped and rounded; alpha becomes 255.
pub fn to_ldr(hdr: &HdrImage) -> LdrImage {
    hdr.map(|px| {
        BytePixel::new(
            unit_to_byte(encode_gamma(px.r)),
            unit_to_byte(encode_gamma(px.g)),
            unit_to_byte(encode_gamma(px.b)),
            u8::MAX,
        )
    })
}

fn check_encodable(image: &HdrImage) -> IoResult<()> {
    if image.is_empty() {
        return Err(IoError::EncodeError(format!(
            "cannot write a {}x{} image as HDR",
            image.width(),
            image.height()
        )));
    }
    Ok(())
}

fn read_header<R: BufRead>(reader: &mut R) -> IoResult<Header> {
    let mut line = String::new();

    reader.read_line(&mut line)?;
    if !trim_line(&line).starts_with(HDR_MAGIC) {
        return Err(IoError::InvalidFile("HDR magic not found".into()));
    }

    let mut format = FORMAT_RGBE.to_string();

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(IoError::InvalidFile("missing HDR resolution line".into()));
        }
        let line = trim_line(&line);

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('+') || line.starts_with('-') {
            let (width, height) = parse_resolution(line).ok_or_else(|| {
                IoError::InvalidFile(format!("unsupported HDR resolution line: {}", line))
            })?;
            return Ok(Header {
                width,
                height,
                format,
            });
        }

        if let Some((key, value)) = line.split_once('=') {
            match key.trim().to_uppercase().as_str() {
                "FORMAT" => format = value.trim().to_string(),
                "EXPOSURE" => debug!(exposure = value.trim(), "HDR exposure tag ignored"),
                _ => {}
            }
        }
    }
}

fn read_pixels<R: Read>(reader: &mut R, width: usize, height: usize) -> IoResult<Vec<u8>> {
    if width as u64 * height as u64 > MAX_PIXELS {
        return Err(IoError::InvalidFile(format!(
            "HDR size {}x{} exceeds the {} pixel limit",
            width, height, MAX_PIXELS
        )));
    }

    let mut first = [0u8; 4];
    reader.read_exact(&mut first)?;

    let use_rle = (RLE_MIN_WIDTH..=RLE_MAX_WIDTH).contains(&width)
        && first[0] == 2
        && first[1] == 2
        && first[2] & 0x80 == 0;

    // Grows per scanline so a truncated file fails before the full allocation
    let mut rgbe = Vec::new();
    let mut scanline = vec![0u8; width * 4];
    for y in 0..height {
        if use_rle {
            let header = if y == 0 {
                first
            } else {
                let mut header = [0u8; 4];
                reader.read_exact(&mut header)?;
                header
            };
            decode_rle_scanline(reader, width, &mut scanline, header)?;
        } else if y == 0 {
            scanline[..4].copy_from_slice(&first);
            reader.read_exact(&mut scanline[4..])?;
        } else {
            reader.read_exact(&mut scanline)?;
        }
        rgbe.extend_from_slice(&scanline);
    }

    Ok(rgbe)
}

fn decode_rle_scanline<R: Read>(
    reader: &mut R,
    width: usize,
    out: &mut [u8],
    header: [u8; 4],
) -> IoResult<()> {
    if header[0] != 2 || header[1] != 2 {
        return Err(IoError::InvalidFile("HDR RLE header invalid".into()));
    }
    let encoded_width = ((header[2] as usize) << 8) | (header[3] as usize);
    if encoded_width != width {
        return Err(IoError::InvalidFile(format!(
            "HDR RLE width mismatch: {} vs {}",
            encoded_width, width
        )));
    }

    let mut channel = vec![0u8; width];
    for c in 0..4 {
        let mut idx = 0usize;
        while idx < width {
            let mut count = [0u8; 1];
            reader.read_exact(&mut count)?;
            let count = count[0] as usize;

            let run = if count > 128 { count - 128 } else { count };
            if run == 0 || idx + run > width {
                return Err(IoError::InvalidFile("HDR RLE run overflows scanline".into()));
            }

            if count > 128 {
                let mut value = [0u8; 1];
                reader.read_exact(&mut value)?;
                channel[idx..idx + run].fill(value[0]);
            } else {
                reader.read_exact(&mut channel[idx..idx + run])?;
            }
            idx += run;
        }

        for (x, &v) in channel.iter().enumerate() {
            out[x * 4 + c] = v;
        }
    }

    Ok(())
}

fn write_pixels<W: Write>(writer: &mut W, image: &HdrImage) -> IoResult<()> {
    let width = image.width() as usize;
    let use_rle = (RLE_MIN_WIDTH..=RLE_MAX_WIDTH).contains(&width);

    let mut scanline = vec![0u8; width * 4];
    for row in image.rows() {
        for (x, px) in row.iter().enumerate() {
            let offset = x * 4;
            scanline[offset..offset + 4].copy_from_slice(&f32_to_rgbe(px.r, px.g, px.b));
        }

        if use_rle {
            let header = [2u8, 2u8, (width >> 8) as u8, (width & 0xFF) as u8];
            writer.write_all(&header)?;
            encode_rle_scanline(writer, &scanline)?;
        } else {
            writer.write_all(&scanline)?;
        }
    }

    Ok(())
}

fn encode_rle_scanline<W: Write>(writer: &mut W, scanline: &[u8]) -> IoResult<()> {
    for c in 0..4 {
        let channel: Vec<u8> = scanline.iter().skip(c).step_by(4).copied().collect();
        writer.write_all(&encode_rle_channel(&channel))?;
    }
    Ok(())
}

fn encode_rle_channel(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() * 2);
    let mut i = 0usize;
    while i < data.len() {
        let run = run_length(data, i);
        if run >= 4 {
            out.push((128 + run) as u8);
            out.push(data[i]);
            i += run;
            continue;
        }

        let start = i;
        let mut literal = 0usize;
        while i < data.len() && literal < 128 {
            if run_length(data, i) >= 4 {
                break;
            }
            i += 1;
            literal += 1;
        }
        out.push(literal as u8);
        out.extend_from_slice(&data[start..start + literal]);
    }
    out
}

fn run_length(data: &[u8], start: usize) -> usize {
    let mut run = 1usize;
    while start + run < data.len() && run < 127 && data[start] == data[start + run] {
        run += 1;
    }
    run
}

fn f32_to_rgbe(r: f32, g: f32, b: f32) -> [u8; 4] {
    let r = r.max(0.0);
    let g = g.max(0.0);
    let b = b.max(0.0);
    let max = r.max(g).max(b);
    if max < 1.0e-32 {
        return [0, 0, 0, 0];
    }

    let (m, e) = frexp(max);
    let scale = m * 256.0 / max;

    [
        (r * scale).clamp(0.0, 255.0) as u8,
        (g * scale).clamp(0.0, 255.0) as u8,
        (b * scale).clamp(0.0, 255.0) as u8,
        (e + 128).clamp(0, 255) as u8,
    ]
}

fn rgbe_to_f32(r: u8, g: u8, b: u8, e: u8) -> (f32, f32, f32) {
    if e == 0 {
        return (0.0, 0.0, 0.0);
    }
    let f = 2.0_f32.powi(e as i32 - 136);
    (r as f32 * f, g as f32 * f, b as f32 * f)
}

fn frexp(x: f32) -> (f32, i32) {
    if x == 0.0 || !x.is_finite() {
        return (x, 0);
    }
    let bits = x.to_bits();
    let biased = ((bits >> 23) & 0xff) as i32;
    if biased == 0 {
        // Subnormal: normalize first
        let (m, e) = frexp(x * 2.0_f32.powi(64));
        return (m, e - 64);
    }
    let m = f32::from_bits((bits & !(0xff << 23)) | (126 << 23));
    (m, biased - 126)
}

/// Parses the standard `-Y <height> +X <width>` orientation.
fn parse_resolution(line: &str) -> Option<(u32, u32)> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts.as_slice() {
        ["-Y", h, "+X", w] => {
            let width: u32 = w.parse().ok()?;
            let height: u32 = h.parse().ok()?;
            (width > 0 && height > 0).then_some((width, height))
        }
        _ => None,
    }
}

fn trim_line(line: &str) -> &str {
    line.trim_end_matches(&['\r', '\n'][..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn gradient(width: u32, height: u32) -> HdrImage {
        let pixels = (0..width * height)
            .map(|i| {
                let v = i as f32 / 10.0;
                FloatPixel::new(v, v * 0.5 + 0.01, 4.0 - v.min(4.0) + 0.01, 1.0)
            })
            .collect();
        HdrImage::from_pixels(width, height, pixels).unwrap()
    }

    fn encode_to_vec(image: &HdrImage) -> Vec<u8> {
        let mut buf = Vec::new();
        encode(&mut buf, image).unwrap();
        buf
    }

    fn assert_close(a: &HdrImage, b: &HdrImage) {
        assert_eq!(a.dimensions(), b.dimensions());
        for (p, q) in a.pixels().iter().zip(b.pixels()) {
            let max = p.r.max(p.g).max(p.b);
            for (x, y) in [(p.r, q.r), (p.g, q.g), (p.b, q.b)] {
                assert!((x - y).abs() <= max / 64.0, "{:?} vs {:?}", p, q);
            }
            assert_eq!(q.a, 1.0);
        }
    }

    #[test]
    fn parse_resolution_line() {
        assert_eq!(parse_resolution("-Y 2 +X 3"), Some((3, 2)));
        assert_eq!(parse_resolution("-Y  5   +X 4"), Some((4, 5)));
        assert_eq!(parse_resolution("+X 4 -Y 5"), None);
        assert_eq!(parse_resolution("-Y 0 +X 4"), None);
        assert_eq!(parse_resolution("-Y a +X 4"), None);
    }

    #[test]
    fn rgbe_roundtrip_values() {
        let (r, g, b) = {
            let e = f32_to_rgbe(1.0, 0.5, 0.25);
            rgbe_to_f32(e[0], e[1], e[2], e[3])
        };
        assert_relative_eq!(r, 1.0, epsilon = 1e-2);
        assert_relative_eq!(g, 0.5, epsilon = 1e-2);
        assert_relative_eq!(b, 0.25, epsilon = 1e-2);

        assert_eq!(f32_to_rgbe(0.0, -1.0, 0.0), [0, 0, 0, 0]);
        assert_eq!(rgbe_to_f32(10, 20, 30, 0), (0.0, 0.0, 0.0));
    }

    #[test]
    fn hdr_roundtrip_flat() {
        // Width below 8 is written without RLE
        let image = gradient(4, 2);
        let decoded = decode_memory(&encode_to_vec(&image)).unwrap();
        assert_close(&image, &decoded);
    }

    #[test]
    fn hdr_roundtrip_rle() {
        let mut image = gradient(40, 3);
        for px in image.pixels_mut().iter_mut().take(20) {
            *px = FloatPixel::new(2.0, 2.0, 2.0, 1.0);
        }
        let decoded = decode_memory(&encode_to_vec(&image)).unwrap();
        assert_close(&image, &decoded);
    }

    #[test]
    fn alpha_is_dropped_and_read_as_one() {
        let image = HdrImage::filled(2, 2, FloatPixel::new(0.5, 0.5, 0.5, 0.25));
        let decoded = decode_memory(&encode_to_vec(&image)).unwrap();
        assert!(decoded.pixels().iter().all(|px| px.a == 1.0));
    }

    #[test]
    fn rle_channel_encoding() {
        let data = [7u8; 10];
        assert_eq!(encode_rle_channel(&data), vec![128 + 10, 7]);

        let data = [1u8, 2, 3];
        assert_eq!(encode_rle_channel(&data), vec![3, 1, 2, 3]);
    }

    #[test]
    fn header_with_comments_and_exposure() {
        let mut data = b"#?RADIANCE\n# made by hand\nEXPOSURE=1.0\nFORMAT=32-bit_rle_rgbe\n\n-Y 1 +X 1\n".to_vec();
        data.extend_from_slice(&[128, 64, 32, 129]);
        let image = decode_memory(&data).unwrap();
        assert_eq!(image.dimensions(), (1, 1));
        assert_relative_eq!(image[0].r, 1.0);
        assert_relative_eq!(image[0].g, 0.5);
        assert_relative_eq!(image[0].b, 0.25);
    }

    #[test]
    fn corrupted_inputs_fail() {
        assert!(matches!(
            decode_memory(b"P6\n1 1\n255\n"),
            Err(IoError::InvalidFile(_))
        ));
        assert!(matches!(
            decode_memory(b"#?RADIANCE\nFORMAT=32-bit_rle_rgbe\n\n"),
            Err(IoError::InvalidFile(_))
        ));
        assert!(matches!(
            decode_memory(b"#?RADIANCE\n\n+X 2 +Y 2\n"),
            Err(IoError::InvalidFile(_))
        ));
        // Truncated pixel block
        assert!(matches!(
            decode_memory(b"#?RADIANCE\n\n-Y 2 +X 2\n\x80\x80"),
            Err(IoError::Io(_))
        ));
    }

    #[test]
    fn oversized_header_is_rejected() {
        let data = b"#?RADIANCE\nFORMAT=32-bit_rle_rgbe\n\n-Y 2000000 +X 2000000\n\x02\x02\x00\x08";
        assert!(matches!(decode_memory(data), Err(IoError::InvalidFile(_))));

        let data = b"#?RADIANCE\n\n-Y 1 +X 4000000000\n\x00\x00\x00\x00";
        assert!(matches!(decode_memory(data), Err(IoError::InvalidFile(_))));
    }

    #[test]
    fn large_truncated_image_fails_with_io_error() {
        // Within the limit but only one scanline present
        let mut data = b"#?RADIANCE\n\n-Y 10000 +X 10000\n".to_vec();
        data.extend_from_slice(&[2, 2, 0x27, 0x10]);
        for _ in 0..4 {
            for _ in 0..78 {
                data.extend_from_slice(&[128 + 127, 0]);
            }
            data.extend_from_slice(&[128 + 94, 0]);
        }
        assert!(matches!(decode_memory(&data), Err(IoError::Io(_))));
    }

    #[test]
    fn frexp_is_exact_near_powers_of_two() {
        let below_two = f32::from_bits(2.0_f32.to_bits() - 1);
        assert_eq!(frexp(below_two), (below_two / 2.0, 1));
        assert_eq!(frexp(1.0), (0.5, 1));
        assert_eq!(frexp(0.75), (0.75, 0));
        assert_eq!(frexp(-8.0), (-0.5, 4));
        assert_eq!(frexp(0.0), (0.0, 0));

        let tiny = f32::from_bits(1);
        let (m, e) = frexp(tiny);
        assert_eq!((m, e), (0.5, -148));

        for bits in (0x3380_0000u32..0x4f00_0000).step_by(9_973) {
            let x = f32::from_bits(bits);
            let (m, e) = frexp(x);
            assert!((0.5..1.0).contains(&m), "x={} m={}", x, m);
            assert_eq!(m * 2.0_f32.powi(e), x);
        }
    }

    #[test]
    fn rgbe_keeps_full_mantissa_below_power_of_two() {
        let below_two = f32::from_bits(2.0_f32.to_bits() - 1);
        assert_eq!(f32_to_rgbe(below_two, 0.0, 0.0), [255, 0, 0, 129]);
    }

    #[test]
    fn rle_overrun_is_rejected() {
        let mut data = b"#?RADIANCE\n\n-Y 1 +X 8\n".to_vec();
        data.extend_from_slice(&[2, 2, 0, 8]);
        // Run of 9 into an 8-wide scanline
        data.extend_from_slice(&[128 + 9, 1]);
        assert!(matches!(decode_memory(&data), Err(IoError::InvalidFile(_))));
    }

    #[test]
    fn empty_image_is_not_encodable() {
        let mut buf = Vec::new();
        assert!(matches!(
            encode(&mut buf, &HdrImage::empty()),
            Err(IoError::EncodeError(_))
        ));
        assert!(buf.is_empty());
    }

    #[test]
    fn to_ldr_gamma_encodes_and_rounds() {
        let hdr = HdrImage::filled(1, 1, FloatPixel::new(1.0, 0.0, 4.0, 0.1));
        let ldr = to_ldr(&hdr);
        assert_eq!(ldr[0], BytePixel::new(255, 0, 255, 255));

        let mid = to_ldr(&HdrImage::filled(1, 1, FloatPixel::new(0.218, 0.218, 0.218, 1.0)));
        assert!((mid[0].r as i32 - 128).abs() <= 1);
    }
}
