use crate::constants::MAX_FILE_SIZE;
use crate::error::{Result, SqueezeError};
use std::fs;
use std::path::{Path, PathBuf};

/// Validate an input file path for accessibility and size
pub fn validate_input_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(SqueezeError::FileNotFound(path.to_path_buf()));
    }

    // Directories are walked by the collector, never submitted directly
    if !path.is_file() {
        return Err(SqueezeError::FileNotFound(path.to_path_buf()));
    }

    let metadata = fs::metadata(path).map_err(|_| SqueezeError::FileNotFound(path.to_path_buf()))?;
    if metadata.len() > MAX_FILE_SIZE {
        return Err(SqueezeError::FileTooLarge(metadata.len(), MAX_FILE_SIZE));
    }

    Ok(())
}

/// Validate the output directory and create it if it doesn't exist
pub fn validate_output_dir(path: &Path) -> Result<PathBuf> {
    if path.exists() && !path.is_dir() {
        return Err(SqueezeError::DirectoryCreationFailed(path.to_path_buf()));
    }

    fs::create_dir_all(path).map_err(|_| SqueezeError::DirectoryCreationFailed(path.to_path_buf()))?;

    path.canonicalize()
        .map_err(|_| SqueezeError::DirectoryCreationFailed(path.to_path_buf()))
}
