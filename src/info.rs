use crate::error::Result;
use crate::formats::MediaKind;
use crate::policy::ReductionRule;
use crate::processing::{fit_within, BoundingBox};
use crate::source::guess_media_type;
use crate::utils::{format_file_size, scale_size};
use crate::validation::validate_input_path;
use image::ImageReader;
use std::fs;
use std::path::{Path, PathBuf};

/// What the reduction policy would do to one file on disk.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub byte_size: u64,
    pub media_type: String,
    pub kind: MediaKind,
    pub rule: ReductionRule,
    /// Source dimensions, when the file is a readable image
    pub dimensions: Option<(u32, u32)>,
    /// Dimensions after fitting into the bounding box
    pub planned_dimensions: Option<(u32, u32)>,
}

impl FileReport {
    /// Reported size the policy would produce without encoding, if known upfront.
    pub fn projected_size(&self) -> Option<u64> {
        match self.rule {
            ReductionRule::Passthrough => Some(self.byte_size),
            ReductionRule::Simulated { reported_percent } => {
                Some(scale_size(self.byte_size, reported_percent))
            }
            ReductionRule::Reencode { .. } => None,
        }
    }
}

pub fn inspect_file(path: &Path, bounds: BoundingBox) -> Result<FileReport> {
    validate_input_path(path)?;

    let byte_size = fs::metadata(path)?.len();
    let media_type = guess_media_type(path);
    let kind = MediaKind::from_media_type(&media_type);
    let rule = ReductionRule::for_kind(kind);

    let dimensions = if kind.is_image() {
        match read_dimensions(path) {
            Ok(dims) => Some(dims),
            Err(e) => {
                log::warn!("Could not read dimensions of {}: {}", path.display(), e);
                None
            }
        }
    } else {
        None
    };

    let planned_dimensions = dimensions.and_then(|(w, h)| fit_within(w, h, bounds).ok());

    Ok(FileReport {
        path: path.to_path_buf(),
        byte_size,
        media_type,
        kind,
        rule,
        dimensions,
        planned_dimensions,
    })
}

// Header only, no full decode
fn read_dimensions(path: &Path) -> Result<(u32, u32)> {
    Ok(ImageReader::open(path)?
        .with_guessed_format()?
        .into_dimensions()?)
}

pub fn print_file_info(report: &FileReport) {
    crate::info!("📊 Analyzing file: {:?}", report.path);
    crate::info!("📋 Basic Information:");
    crate::info!("  📁 File: {:?}", report.path);
    crate::info!(
        "  📦 File size: {} ({} bytes)",
        format_file_size(report.byte_size),
        report.byte_size
    );
    crate::info!("  🎭 Media type: {} ({})", report.media_type, report.kind);

    if let Some((width, height)) = report.dimensions {
        crate::info!("  📏 Dimensions: {}x{} pixels", width, height);
        crate::info!("  🔢 Total pixels: {}", width as u64 * height as u64);
        crate::info!(
            "  🧠 Estimated memory usage: {:.2} MB",
            estimate_memory_mb(width, height)
        );
    } else if report.kind.is_image() {
        crate::warn!("Image header could not be read, the file will be kept as is");
    }

    crate::info!("\n💡 Planned reduction:");
    crate::info!("  🎯 Rule: {}", report.rule);

    if let Some((width, height)) = report.planned_dimensions {
        if report.dimensions == Some((width, height)) {
            crate::info!("  📏 Already within bounds, no resize");
        } else {
            crate::info!("  📏 Resize to: {}x{} pixels", width, height);
        }
    }

    if let Some(size) = report.projected_size() {
        crate::info!("  📈 Reported size: {}", format_file_size(size));
    }
}

// Decoded surfaces are RGBA8 at worst for the supported formats
fn estimate_memory_mb(width: u32, height: u32) -> f64 {
    (width as u64 * height as u64 * 4) as f64 / (1024.0 * 1024.0)
}
