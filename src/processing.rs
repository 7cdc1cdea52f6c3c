use crate::constants::{DEFAULT_MAX_HEIGHT, DEFAULT_MAX_WIDTH};
use crate::error::{Result, SqueezeError};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

/// Maximum width and height an image may occupy after rescaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub max_width: u32,
    pub max_height: u32,
}

impl BoundingBox {
    pub fn new(max_width: u32, max_height: u32) -> Result<Self> {
        if max_width == 0 || max_height == 0 {
            return Err(SqueezeError::InvalidBoundingBox(max_width, max_height));
        }
        Ok(Self {
            max_width,
            max_height,
        })
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReductionOptions {
    pub bounds: BoundingBox,
}

impl ReductionOptions {
    pub fn new(max_width: Option<u32>, max_height: Option<u32>) -> Result<Self> {
        let bounds = BoundingBox::new(
            max_width.unwrap_or(DEFAULT_MAX_WIDTH),
            max_height.unwrap_or(DEFAULT_MAX_HEIGHT),
        )?;
        Ok(Self { bounds })
    }
}

/// Computes the aspect-preserving size of a `width` x `height` image inside
/// `bounds`.
///
/// Only the dominant axis is checked: a landscape image is capped by
/// `max_width` alone and a portrait (or square) one by `max_height` alone, so
/// the other side may still exceed its bound. Fractional sizes truncate.
///
/// # Returns
/// * `Ok((width, height))` - The new dimensions, never larger than the input
/// * `Err(SqueezeError::Decode)` - If the source or the result has a zero side
///
/// # Example
/// ```
/// use pixel_squeeze::processing::{fit_within, BoundingBox};
///
/// let size = fit_within(1600, 1200, BoundingBox::default()).unwrap();
/// assert_eq!(size, (800, 600));
/// ```
pub fn fit_within(width: u32, height: u32, bounds: BoundingBox) -> Result<(u32, u32)> {
    if width == 0 || height == 0 {
        return Err(SqueezeError::Decode(format!(
            "image has no pixels ({}x{})",
            width, height
        )));
    }

    let (mut new_width, mut new_height) = (width as f64, height as f64);

    if width > height {
        if width > bounds.max_width {
            new_height *= bounds.max_width as f64 / width as f64;
            new_width = bounds.max_width as f64;
        }
    } else if height > bounds.max_height {
        new_width *= bounds.max_height as f64 / height as f64;
        new_height = bounds.max_height as f64;
    }

    let (new_width, new_height) = (new_width as u32, new_height as u32);
    if new_width == 0 || new_height == 0 {
        return Err(SqueezeError::Decode(format!(
            "{}x{} cannot be scaled into {}x{} without a zero-sized side",
            width, height, bounds.max_width, bounds.max_height
        )));
    }

    Ok((new_width, new_height))
}

/// Resamples `img` into the size computed by [`fit_within`].
pub fn rescale_image(img: &DynamicImage, bounds: BoundingBox) -> Result<DynamicImage> {
    let (width, height) = img.dimensions();
    let (new_width, new_height) = fit_within(width, height, bounds)?;

    if (new_width, new_height) == (width, height) {
        return Ok(img.clone());
    }

    log::debug!(
        "Rescaling {}x{} -> {}x{}",
        width,
        height,
        new_width,
        new_height
    );
    Ok(img.resize_exact(new_width, new_height, FilterType::Lanczos3))
}
