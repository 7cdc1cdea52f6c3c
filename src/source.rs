//! Submitted file descriptors.

use crate::constants::FALLBACK_MEDIA_TYPE;
use crate::error::{Result, SqueezeError};
use crate::formats::MediaKind;
use crate::validation::validate_input_path;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Where a file's bytes come from.
#[derive(Debug, Clone)]
pub enum FileContent {
    Memory(Arc<[u8]>),
    Path(PathBuf),
}

impl FileContent {
    /// Reads the whole content. In-memory buffers are shared, not copied.
    pub async fn read_all(&self) -> std::io::Result<Arc<[u8]>> {
        match self {
            FileContent::Memory(bytes) => Ok(Arc::clone(bytes)),
            FileContent::Path(path) => Ok(tokio::fs::read(path).await?.into()),
        }
    }
}

/// A submitted file: metadata plus access to its raw bytes.
///
/// Immutable once created. `byte_size` is the declared size and is what the
/// batch totals are built from, even if the content turns out to differ.
#[derive(Debug, Clone)]
pub struct SourceFile {
    name: String,
    byte_size: u64,
    media_type: String,
    content: FileContent,
}

impl SourceFile {
    pub fn new(
        name: impl Into<String>,
        byte_size: u64,
        media_type: impl Into<String>,
        content: FileContent,
    ) -> Self {
        Self {
            name: name.into(),
            byte_size,
            media_type: media_type.into(),
            content,
        }
    }

    /// Builds an in-memory source whose declared size is the buffer length.
    pub fn from_bytes(
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        let bytes = bytes.into();
        Self::new(
            name,
            bytes.len() as u64,
            media_type,
            FileContent::Memory(bytes),
        )
    }

    /// Describes a file on disk. The media type is guessed from the extension.
    pub async fn from_path(path: &Path) -> Result<Self> {
        validate_input_path(path)?;

        let metadata = tokio::fs::metadata(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| SqueezeError::FileNotFound(path.to_path_buf()))?;

        Ok(Self::new(
            name,
            metadata.len(),
            guess_media_type(path),
            FileContent::Path(path.to_path_buf()),
        ))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn byte_size(&self) -> u64 {
        self.byte_size
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn kind(&self) -> MediaKind {
        MediaKind::from_media_type(&self.media_type)
    }

    pub fn content(&self) -> &FileContent {
        &self.content
    }

    pub async fn read_all(&self) -> std::io::Result<Arc<[u8]>> {
        self.content.read_all().await
    }
}

/// Media type for a path, from its extension.
pub fn guess_media_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_else(|| FALLBACK_MEDIA_TYPE.to_string())
}
