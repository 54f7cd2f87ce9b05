//! Integration tests for tonekit crates.
//!
//! End-to-end checks that run files through the codec layer and the
//! tonemap and compose operations together.

#[cfg(test)]
mod tests {
    use tempfile::tempdir;
    use tonekit_core::{BytePixel, ColorSpace, FloatPixel, HdrImage, LdrImage};
    use tonekit_ops::{compose, tonemap, ComposeParams, OpsError, TonemapParams};

    /// HDR file -> tonemap -> PNG file -> bytes
    #[test]
    fn test_tonemap_pipeline_reference_pixel() {
        let dir = tempdir().unwrap();
        let hdr_path = dir.path().join("scene.hdr");
        let png_path = dir.path().join("scene.png");

        // Exactly representable in RGBE
        let scene = HdrImage::filled(12, 4, FloatPixel::new(1.0, 0.5, 0.25, 1.0));
        tonekit_io::encode_float(&hdr_path, &scene).expect("Failed to write HDR");

        let hdr = tonekit_io::decode_float(&hdr_path).expect("Failed to read HDR");
        let params = TonemapParams::default().with_color_space(ColorSpace::Linear);
        let ldr = tonemap(&hdr, &params);
        tonekit_io::encode_bytes(&png_path, &ldr).expect("Failed to write PNG");

        let loaded = tonekit_io::decode_bytes(&png_path).expect("Failed to read PNG");
        assert_eq!(loaded.dimensions(), (12, 4));
        assert!(
            loaded
                .pixels()
                .iter()
                .all(|&px| px == BytePixel::new(255, 127, 63, 255))
        );
    }

    #[test]
    fn test_tonemap_pipeline_srgb_and_exposure() {
        let dir = tempdir().unwrap();
        let hdr_path = dir.path().join("bright.hdr");

        let scene = HdrImage::filled(2, 2, FloatPixel::new(0.872, 0.872, 0.872, 1.0));
        tonekit_io::encode_float(&hdr_path, &scene).unwrap();
        let hdr = tonekit_io::decode_float(&hdr_path).unwrap();

        // -2 stops: ~0.218 linear, ~0.5 after gamma encoding
        let params = TonemapParams::default().with_exposure(-2.0);
        let px = tonemap(&hdr, &params)[0];
        assert!((px.r as i32 - 127).abs() <= 1, "{:?}", px);
        assert_eq!(px.a, 255);
    }

    /// PNG layers -> compose -> PNG
    #[test]
    fn test_compose_pipeline() {
        let dir = tempdir().unwrap();
        let bottom = dir.path().join("bottom.png");
        let top = dir.path().join("top.png");
        let out = dir.path().join("out.png");

        tonekit_io::encode_bytes(&bottom, &LdrImage::filled(3, 2, BytePixel::new(0, 0, 255, 255)))
            .unwrap();
        tonekit_io::encode_bytes(&top, &LdrImage::filled(3, 2, BytePixel::new(255, 0, 0, 128)))
            .unwrap();

        let layers = vec![
            tonekit_io::decode_bytes(&bottom).unwrap(),
            tonekit_io::decode_bytes(&top).unwrap(),
        ];
        let params = ComposeParams::default().with_color_space(ColorSpace::Linear);
        let flat = compose(&layers, &params).unwrap();
        tonekit_io::encode_bytes(&out, &flat).unwrap();

        let loaded = tonekit_io::decode_bytes(&out).unwrap();
        assert_eq!(loaded, flat);
        let px = loaded[(2, 1)];
        assert!((px.r as i32 - 128).abs() <= 1, "{:?}", px);
        assert_eq!(px.g, 0);
        assert!((px.b as i32 - 127).abs() <= 1, "{:?}", px);
        assert_eq!(px.a, 255);
    }

    /// A tonemapped frame used as the bottom layer of a stack
    #[test]
    fn test_tonemap_then_compose() {
        let dir = tempdir().unwrap();
        let overlay_path = dir.path().join("overlay.png");

        let frame = tonemap(
            &HdrImage::filled(4, 4, FloatPixel::new(2.0, 2.0, 2.0, 1.0)),
            &TonemapParams::default(),
        );
        assert!(frame.pixels().iter().all(|&px| px == BytePixel::new(255, 255, 255, 255)));

        let mut overlay = LdrImage::new(4, 4);
        overlay.set(1, 1, BytePixel::new(0, 0, 0, 255)).unwrap();
        tonekit_io::encode_bytes(&overlay_path, &overlay).unwrap();
        let overlay = tonekit_io::decode_bytes(&overlay_path).unwrap();

        let flat = compose(&[frame, overlay], &ComposeParams::default()).unwrap();
        assert_eq!(flat[(1, 1)], BytePixel::new(0, 0, 0, 255));
        assert_eq!(flat[(0, 0)], BytePixel::new(255, 255, 255, 255));
        assert_eq!(flat[(3, 3)], BytePixel::new(255, 255, 255, 255));
    }

    #[test]
    fn test_compose_mismatched_files() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        tonekit_io::encode_bytes(&a, &LdrImage::new(4, 4)).unwrap();
        tonekit_io::encode_bytes(&b, &LdrImage::new(2, 4)).unwrap();

        let layers = vec![
            tonekit_io::decode_bytes(&a).unwrap(),
            tonekit_io::decode_bytes(&b).unwrap(),
        ];
        assert!(matches!(
            compose(&layers, &ComposeParams::default()),
            Err(OpsError::SizeMismatch(_))
        ));
    }

    #[test]
    fn test_empty_compose_cannot_be_saved() {
        let dir = tempdir().unwrap();
        let flat = compose(&[], &ComposeParams::default()).unwrap();
        assert!(tonekit_io::encode_bytes(dir.path().join("empty.png"), &flat).is_err());
    }

    #[test]
    fn test_png_as_hdr_input() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ldr_source.png");
        let source = LdrImage::filled(2, 1, BytePixel::new(200, 100, 0, 255));
        tonekit_io::encode_bytes(&path, &source).unwrap();

        // Linearize on load, re-encode on tonemap: within one step of the source
        let hdr = tonekit_io::decode_float(&path).unwrap();
        let ldr = tonemap(&hdr, &TonemapParams::default());
        for (a, b) in ldr.pixels().iter().zip(source.pixels()) {
            for (x, y) in a.to_array().into_iter().zip(b.to_array()) {
                assert!((x as i32 - y as i32).abs() <= 1, "{:?} vs {:?}", a, b);
            }
        }
    }
}
