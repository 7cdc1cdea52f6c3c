/// Media type families and type-safe format handling
///
/// Every submitted file is classified into one `MediaKind` from its media
/// type string. The reduction policy dispatches on the kind, so supporting a
/// new format means adding a variant here.

use image::ImageFormat;
use std::fmt;

/// Families of media types the reduction policy distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    /// `image/jpeg`
    Jpeg,
    /// `image/png`
    Png,
    /// `image/webp`
    WebP,
    /// `application/pdf`
    Pdf,
    /// Anything else, passed through untouched
    Other,
}

impl MediaKind {
    /// Classify a media type string.
    ///
    /// Image families match by prefix (so parameters such as
    /// `image/png; charset=binary` still match), PDF matches exactly.
    pub fn from_media_type(media_type: &str) -> Self {
        let media_type = media_type.trim().to_ascii_lowercase();

        if media_type.starts_with("image/jpeg") {
            MediaKind::Jpeg
        } else if media_type.starts_with("image/png") {
            MediaKind::Png
        } else if media_type == "application/pdf" {
            MediaKind::Pdf
        } else if media_type.starts_with("image/webp") {
            MediaKind::WebP
        } else {
            MediaKind::Other
        }
    }

    /// The encoder format used when this kind is re-encoded
    pub fn image_format(&self) -> Option<ImageFormat> {
        match self {
            MediaKind::Jpeg => Some(ImageFormat::Jpeg),
            MediaKind::Png => Some(ImageFormat::Png),
            MediaKind::WebP => Some(ImageFormat::WebP),
            MediaKind::Pdf | MediaKind::Other => None,
        }
    }

    pub fn is_image(&self) -> bool {
        self.image_format().is_some()
    }

    /// Canonical media type for this kind
    pub fn media_type(&self) -> &'static str {
        match self {
            MediaKind::Jpeg => "image/jpeg",
            MediaKind::Png => "image/png",
            MediaKind::WebP => "image/webp",
            MediaKind::Pdf => "application/pdf",
            MediaKind::Other => crate::constants::FALLBACK_MEDIA_TYPE,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MediaKind::Jpeg => "JPEG",
            MediaKind::Png => "PNG",
            MediaKind::WebP => "WebP",
            MediaKind::Pdf => "PDF",
            MediaKind::Other => "other",
        };
        write!(f, "{}", name)
    }
}
