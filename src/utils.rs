/// Utility functions for common operations
///
/// Size formatting, reduction arithmetic and progress widgets shared by the
/// batch pipeline and the command line front end.

use crate::constants::{PROGRESS_BAR_TEMPLATE, PROGRESS_SPINNER_TEMPLATE};
use indicatif::{ProgressBar, ProgressStyle};

const SIZE_UNITS: &[&str] = &["Bytes", "KB", "MB", "GB", "TB"];
const THRESHOLD: f64 = 1024.0;

/// Format a byte count in human-readable form
///
/// Values are shown with at most `decimals` fractional digits and trailing
/// zeros are dropped, so 1024 renders as "1 KB" and 1536 as "1.5 KB".
///
/// # Arguments
/// * `bytes` - Size in bytes
/// * `decimals` - Maximum number of fractional digits
pub fn format_bytes(bytes: u64, decimals: usize) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD && unit_index < SIZE_UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    let mut rendered = format!("{:.*}", decimals, size);
    if rendered.contains('.') {
        rendered = rendered.trim_end_matches('0').trim_end_matches('.').to_string();
    }

    format!("{} {}", rendered, SIZE_UNITS[unit_index])
}

/// Format a byte count with two fractional digits
pub fn format_file_size(bytes: u64) -> String {
    format_bytes(bytes, 2)
}

/// Calculate the size reduction as a percentage
///
/// # Returns
/// * Positive means the file shrank, negative means it grew. Zero for an
///   empty original.
pub fn calculate_reduction_percent(original_size: u64, reduced_size: u64) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    ((original_size as f64 - reduced_size as f64) / original_size as f64) * 100.0
}

/// Scale a byte count by an integer percentage, rounding down
pub fn scale_size(size: u64, percent: u64) -> u64 {
    (size as u128 * percent as u128 / 100) as u64
}

/// Create a progress bar for `total` items with consistent styling
pub fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(PROGRESS_BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    pb
}

/// Create a progress spinner with consistent styling
pub fn create_progress_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template(PROGRESS_SPINNER_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb
}
