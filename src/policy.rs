//! Per-format size reduction rules.

use crate::codec::{ImageCodec, ImageCrateCodec};
use crate::constants::{
    JPEG_QUALITY, JPEG_REPORTED_PERCENT, MAX_IMAGE_DIMENSION, PDF_REPORTED_PERCENT, PNG_QUALITY,
    PNG_REPORTED_PERCENT, WEBP_QUALITY, WEBP_REPORTED_PERCENT,
};
use crate::error::{Result, SqueezeError};
use crate::formats::MediaKind;
use crate::processing::{rescale_image, BoundingBox, ReductionOptions};
use crate::source::SourceFile;
use crate::utils::scale_size;
use image::{GenericImageView, ImageFormat};
use std::fmt;
use std::sync::Arc;

/// What happens to one media family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReductionRule {
    /// Decode, fit into the bounding box, encode at `quality`. The reported
    /// size is `reported_percent` of the encoded length.
    Reencode {
        format: ImageFormat,
        quality: u8,
        reported_percent: u64,
    },
    /// Keep the bytes, report `reported_percent` of the declared size.
    Simulated { reported_percent: u64 },
    /// Keep the bytes, report the declared size.
    Passthrough,
}

impl ReductionRule {
    pub fn for_kind(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Jpeg => ReductionRule::Reencode {
                format: ImageFormat::Jpeg,
                quality: JPEG_QUALITY,
                reported_percent: JPEG_REPORTED_PERCENT,
            },
            MediaKind::Png => ReductionRule::Reencode {
                format: ImageFormat::Png,
                quality: PNG_QUALITY,
                reported_percent: PNG_REPORTED_PERCENT,
            },
            MediaKind::WebP => ReductionRule::Reencode {
                format: ImageFormat::WebP,
                quality: WEBP_QUALITY,
                reported_percent: WEBP_REPORTED_PERCENT,
            },
            MediaKind::Pdf => ReductionRule::Simulated {
                reported_percent: PDF_REPORTED_PERCENT,
            },
            MediaKind::Other => ReductionRule::Passthrough,
        }
    }
}

impl fmt::Display for ReductionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReductionRule::Reencode {
                format,
                quality,
                reported_percent,
            } => write!(
                f,
                "re-encode as {:?} at quality {} (reported size {}% of output)",
                format, quality, reported_percent
            ),
            ReductionRule::Simulated { reported_percent } => write!(
                f,
                "keep bytes (reported size {}% of original)",
                reported_percent
            ),
            ReductionRule::Passthrough => write!(f, "pass through unchanged"),
        }
    }
}

/// Result of reducing one file.
#[derive(Debug, Clone)]
pub struct Reduced {
    pub payload: Arc<[u8]>,
    pub reduced_size: u64,
    /// Output dimensions, for re-encoded images only
    pub dimensions: Option<(u32, u32)>,
}

/// Maps a file to its reduced payload and reported size.
///
/// `reduced_size` depends only on the bytes, the media type and the bounding
/// box.
#[derive(Clone)]
pub struct ReductionPolicy {
    codec: Arc<dyn ImageCodec>,
    bounds: BoundingBox,
}

impl ReductionPolicy {
    pub fn new(options: &ReductionOptions) -> Self {
        Self::with_codec(Arc::new(ImageCrateCodec::new()), options.bounds)
    }

    pub fn with_codec(codec: Arc<dyn ImageCodec>, bounds: BoundingBox) -> Self {
        Self { codec, bounds }
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    pub async fn reduce(&self, file: &SourceFile, bytes: Arc<[u8]>) -> Result<Reduced> {
        match ReductionRule::for_kind(file.kind()) {
            ReductionRule::Passthrough => Ok(Reduced {
                payload: bytes,
                reduced_size: file.byte_size(),
                dimensions: None,
            }),
            ReductionRule::Simulated { reported_percent } => Ok(Reduced {
                payload: bytes,
                reduced_size: scale_size(file.byte_size(), reported_percent),
                dimensions: None,
            }),
            ReductionRule::Reencode {
                format,
                quality,
                reported_percent,
            } => {
                let codec = Arc::clone(&self.codec);
                let bounds = self.bounds;

                // Decoding and encoding are CPU bound
                let (encoded, dimensions) = tokio::task::spawn_blocking(move || {
                    reencode(codec.as_ref(), &bytes, bounds, format, quality)
                })
                .await
                .map_err(|e| SqueezeError::Decode(format!("image task failed: {}", e)))??;

                let reduced_size = scale_size(encoded.len() as u64, reported_percent);
                Ok(Reduced {
                    payload: encoded.into(),
                    reduced_size,
                    dimensions: Some(dimensions),
                })
            }
        }
    }
}

impl fmt::Debug for ReductionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReductionPolicy")
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}

fn reencode(
    codec: &dyn ImageCodec,
    bytes: &[u8],
    bounds: BoundingBox,
    format: ImageFormat,
    quality: u8,
) -> Result<(Vec<u8>, (u32, u32))> {
    let img = codec.decode(bytes)?;

    let (width, height) = img.dimensions();
    if width > MAX_IMAGE_DIMENSION || height > MAX_IMAGE_DIMENSION {
        return Err(SqueezeError::Decode(format!(
            "image is {}x{}, maximum allowed is {}x{}",
            width, height, MAX_IMAGE_DIMENSION, MAX_IMAGE_DIMENSION
        )));
    }

    let resized = rescale_image(&img, bounds)?;
    let dimensions = resized.dimensions();
    let encoded = codec.encode(&resized, format, quality)?;

    Ok((encoded, dimensions))
}
