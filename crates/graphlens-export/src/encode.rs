//! Bitmap encoders

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageResult, RgbaImage};

/// Lossless PNG with alpha.
pub fn encode_png(image: &RgbaImage) -> ImageResult<Vec<u8>> {
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(buf)
}

/// Lossy JPEG. `quality` is in `0.0..=1.0`; alpha is discarded.
pub fn encode_jpeg(image: &RgbaImage, quality: f64) -> ImageResult<Vec<u8>> {
    let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, jpeg_quality(quality)).write_image(
        rgb.as_raw(),
        rgb.width(),
        rgb.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(buf)
}

/// Map `0.0..=1.0` onto the encoder's `1..=100`.
pub fn jpeg_quality(quality: f64) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_jpeg_quality_mapping() {
        assert_eq!(jpeg_quality(0.9), 90);
        assert_eq!(jpeg_quality(0.0), 1);
        assert_eq!(jpeg_quality(1.0), 100);
    }

    #[test]
    fn test_encoders_emit_magic_bytes() {
        let image = RgbaImage::from_pixel(8, 8, Rgba([15, 15, 35, 255]));
        let png = encode_png(&image).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        let jpeg = encode_jpeg(&image, 0.9).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }
}
