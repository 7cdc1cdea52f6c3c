pub const DEFAULT_MAX_WIDTH: u32 = 800;
pub const DEFAULT_MAX_HEIGHT: u32 = 600;

pub const JPEG_QUALITY: u8 = 70;
pub const PNG_QUALITY: u8 = 70;
pub const WEBP_QUALITY: u8 = 80;

// Reported size as a percentage of the measured size.
pub const JPEG_REPORTED_PERCENT: u64 = 100;
pub const PNG_REPORTED_PERCENT: u64 = 50;
pub const WEBP_REPORTED_PERCENT: u64 = 80;
pub const PDF_REPORTED_PERCENT: u64 = 60;

pub const PNG_OPTIMIZATION_PRESET: u8 = 2;
pub const ZOPFLI_ITERATIONS: u8 = 15;
pub const LIBDEFLATER_HIGH_LEVEL: u8 = 12;
pub const LIBDEFLATER_LOW_LEVEL: u8 = 8;

/// Maximum size of a single input file (100MB)
pub const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;
/// Largest width or height accepted after decoding
pub const MAX_IMAGE_DIMENSION: u32 = 16384;
pub const MAX_BATCH_FILES: usize = 1000;
/// Maximum declared size of a whole batch (2GB)
pub const MAX_BATCH_BYTES: u64 = 2 * 1024 * 1024 * 1024;

pub const EXPORT_PREFIX: &str = "compressed_";
pub const DEFAULT_ARCHIVE_NAME: &str = "compressed_files.zip";
pub const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

pub const PROGRESS_BAR_TEMPLATE: &str =
    "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}";
pub const PROGRESS_SPINNER_TEMPLATE: &str = "{spinner:.green} {msg}";

// Common output message prefixes
pub const ORIGINAL_SIZE_PREFIX: &str = "📊 Total original size:";
pub const OPTIMIZED_SIZE_PREFIX: &str = "📈 Total optimized size:";
pub const REDUCTION_PREFIX: &str = "🎯 Overall reduction:";
pub const SUCCESS_PREFIX: &str = "✅";
pub const INFO_PREFIX: &str = "📋";
