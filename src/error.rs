use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqueezeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("No result at index {index} (store holds {len} outcomes)")]
    Lookup { index: usize, len: usize },

    #[error("Export error: {0}")]
    Export(String),

    #[error("Invalid bounding box: {0}x{1}. Both dimensions must be greater than zero")]
    InvalidBoundingBox(u32, u32),

    #[error("File too large: {0} bytes. Maximum allowed: {1} bytes")]
    FileTooLarge(u64, u64),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to create output directory: {0}")]
    DirectoryCreationFailed(PathBuf),

    #[error("No files found in input path: {0}")]
    NoFilesFound(String),

    #[error("Walkdir error: {0}")]
    WalkdirError(#[from] walkdir::Error),

    #[error("Cannot submit an empty batch")]
    EmptyBatch,

    #[error("A batch is already being processed")]
    SessionBusy,

    #[error("Invalid session transition: cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    #[error("Batch file count limit exceeded: {0} files, maximum allowed {1}")]
    BatchFileLimitExceeded(usize, usize),

    #[error("Batch size limit exceeded: {0} bytes declared, maximum allowed {1} bytes")]
    BatchSizeLimitExceeded(u64, u64),
}

impl From<image::ImageError> for SqueezeError {
    fn from(err: image::ImageError) -> Self {
        SqueezeError::Decode(err.to_string())
    }
}

impl From<zip::result::ZipError> for SqueezeError {
    fn from(err: zip::result::ZipError) -> Self {
        SqueezeError::Export(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SqueezeError>;
