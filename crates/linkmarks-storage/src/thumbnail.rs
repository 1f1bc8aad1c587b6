//! Thumbnail encoder: raw capture bytes in, bounded thumbnail bytes out.
//!
//! A pure function over bytes with no I/O, so the same input always
//! produces byte-for-byte identical output under a fixed encoder
//! configuration.

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{Rgb, RgbImage};

use linkmarks_core::config::storage::ThumbnailConfig;
use linkmarks_core::error::{AppError, ErrorKind};
use linkmarks_core::result::AppResult;

/// Re-encodes raw captures as fixed-size JPEG thumbnails: "contain" fit
/// against a white background, lossy re-encode at a fixed quality.
#[derive(Debug, Clone)]
pub struct ThumbnailEncoder {
    width: u32,
    height: u32,
    quality: u8,
}

impl ThumbnailEncoder {
    /// Create an encoder from configuration.
    pub fn new(config: &ThumbnailConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            quality: config.quality,
        }
    }

    /// Output dimensions `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Encode raw image bytes into an exactly `width`x`height` JPEG.
    ///
    /// CPU-bound; callers on the async runtime should wrap this in
    /// `spawn_blocking`.
    pub fn encode(&self, data: &[u8]) -> AppResult<Bytes> {
        if data.is_empty() {
            return Err(AppError::validation("empty image data"));
        }

        let source = image::load_from_memory(data).map_err(|e| {
            AppError::with_source(ErrorKind::Capture, "Failed to decode captured image", e)
        })?;

        // Contain fit: scale to the largest size that fits, then center
        // on a white canvas so the output is always exactly the target.
        let resized = source
            .resize(self.width, self.height, FilterType::Lanczos3)
            .to_rgb8();
        let mut canvas = RgbImage::from_pixel(self.width, self.height, Rgb([255, 255, 255]));
        let x = i64::from((self.width - resized.width()) / 2);
        let y = i64::from((self.height - resized.height()) / 2);
        image::imageops::overlay(&mut canvas, &resized, x, y);

        let mut out = Vec::new();
        JpegEncoder::new_with_quality(&mut out, self.quality)
            .encode_image(&canvas)
            .map_err(|e| {
                AppError::with_source(ErrorKind::Capture, "Failed to encode thumbnail", e)
            })?;

        Ok(Bytes::from(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder() -> ThumbnailEncoder {
        ThumbnailEncoder::new(&ThumbnailConfig::default())
    }

    fn png_fixture(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn output_is_exactly_target_size_for_any_aspect_ratio() {
        let enc = encoder();
        for (w, h) in [(1024, 768), (300, 900), (1, 1), (2000, 100)] {
            let thumb = enc.encode(&png_fixture(w, h)).unwrap();
            let decoded = image::load_from_memory(&thumb).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (280, 210));
        }
    }

    #[test]
    fn encoding_is_deterministic() {
        let enc = encoder();
        let input = png_fixture(640, 480);
        let first = enc.encode(&input).unwrap();
        let second = enc.encode(&input).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn narrow_input_is_padded_with_white() {
        let enc = encoder();
        let thumb = enc.encode(&png_fixture(100, 900)).unwrap();
        let decoded = image::load_from_memory(&thumb).unwrap().to_rgb8();
        // Left edge lies outside the contained image, near-white after
        // JPEG loss.
        let corner = decoded.get_pixel(0, 105);
        assert!(corner.0.iter().all(|&c| c > 240));
    }

    #[test]
    fn garbage_input_is_a_capture_error() {
        let enc = encoder();
        let err = enc.encode(b"not an image").unwrap_err();
        assert_eq!(err.kind, linkmarks_core::error::ErrorKind::Capture);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(encoder().encode(&[]).is_err());
    }
}
