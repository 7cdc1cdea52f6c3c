//! Decode/encode capability used by the image rescaler.

use crate::constants::{
    LIBDEFLATER_HIGH_LEVEL, LIBDEFLATER_LOW_LEVEL, PNG_OPTIMIZATION_PRESET, ZOPFLI_ITERATIONS,
};
use crate::error::{Result, SqueezeError};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ImageFormat};
use oxipng::{Deflaters, Options};
use std::num::NonZeroU8;

/// Turns bytes into a pixel surface and back.
///
/// Implementations must be deterministic: the same image, format and quality
/// always produce the same bytes.
pub trait ImageCodec: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage>;

    /// `quality` is a percentage in 1..=100.
    fn encode(&self, image: &DynamicImage, format: ImageFormat, quality: u8) -> Result<Vec<u8>>;
}

/// Codec backed by the `image` crate, with oxipng post-processing for PNG.
#[derive(Debug, Clone)]
pub struct ImageCrateCodec {
    png_preset: u8,
}

impl ImageCrateCodec {
    pub fn new() -> Self {
        Self {
            png_preset: PNG_OPTIMIZATION_PRESET,
        }
    }

    pub fn with_png_preset(png_preset: u8) -> Self {
        Self { png_preset }
    }

    fn encode_png(&self, image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
        let mut raw = Vec::new();
        image.write_with_encoder(PngEncoder::new(&mut raw))?;

        let mut options = Options::from_preset(self.png_preset);
        options.deflate = if quality >= 90 {
            Deflaters::Zopfli {
                iterations: NonZeroU8::new(ZOPFLI_ITERATIONS).unwrap_or(NonZeroU8::MIN),
            }
        } else if quality >= 70 {
            Deflaters::Libdeflater {
                compression: LIBDEFLATER_HIGH_LEVEL,
            }
        } else {
            Deflaters::Libdeflater {
                compression: LIBDEFLATER_LOW_LEVEL,
            }
        };

        oxipng::optimize_from_memory(&raw, &options)
            .map_err(|e| SqueezeError::Decode(format!("PNG optimization failed: {}", e)))
    }
}

impl Default for ImageCrateCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageCodec for ImageCrateCodec {
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage> {
        image::load_from_memory(bytes)
            .map_err(|e| SqueezeError::Decode(format!("unreadable image: {}", e)))
    }

    fn encode(&self, image: &DynamicImage, format: ImageFormat, quality: u8) -> Result<Vec<u8>> {
        let quality = quality.clamp(1, 100);
        let mut output = Vec::new();

        match format {
            ImageFormat::Jpeg => {
                // JPEG has no alpha channel
                let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
                rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut output, quality))?;
            }
            ImageFormat::Png => {
                output = self.encode_png(image, quality)?;
            }
            ImageFormat::WebP => {
                // The image crate only ships a lossless WebP encoder
                let rgba = DynamicImage::ImageRgba8(image.to_rgba8());
                rgba.write_with_encoder(WebPEncoder::new_lossless(&mut output))?;
            }
            _ => {
                return Err(SqueezeError::Decode(format!(
                    "no encoder for {:?}",
                    format
                )));
            }
        }

        Ok(output)
    }
}
