//! Handing reduced payloads back to the caller: one at a time or as a zip.
//!
//! Nothing here mutates the result store.

use crate::error::{Result, SqueezeError};
use crate::store::ReductionOutcome;
use crate::validation::validate_output_dir;
use std::collections::HashSet;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// A single downloadable file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub name: String,
    pub bytes: Arc<[u8]>,
}

/// Sink that packs named entries into one archive.
pub trait ArchiveBuilder {
    fn add_entry(&mut self, name: &str, bytes: &[u8]) -> Result<()>;

    fn finalize(self) -> Result<Vec<u8>>;
}

/// In-memory deflate zip.
pub struct ZipArchiveBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
}

impl ZipArchiveBuilder {
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
        }
    }
}

impl Default for ZipArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveBuilder for ZipArchiveBuilder {
    fn add_entry(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        self.writer.start_file(name, self.options)?;
        self.writer
            .write_all(bytes)
            .map_err(|e| SqueezeError::Export(format!("failed to write {}: {}", name, e)))
    }

    fn finalize(self) -> Result<Vec<u8>> {
        let cursor = self.writer.finish()?;
        Ok(cursor.into_inner())
    }
}

/// Single-file handoff named `compressed_<name>`.
pub fn export_one(outcome: &ReductionOutcome) -> Result<ExportedFile> {
    let bytes = outcome.payload.as_ref().ok_or_else(|| {
        SqueezeError::Export(format!(
            "no payload available for {}",
            outcome.source.name()
        ))
    })?;

    Ok(ExportedFile {
        name: outcome.export_name(),
        bytes: Arc::clone(bytes),
    })
}

/// Packs every available payload into a zip archive.
pub fn export_all(outcomes: &[ReductionOutcome]) -> Result<Vec<u8>> {
    export_all_with(outcomes, ZipArchiveBuilder::new())
}

/// Packs every available payload through `builder`.
///
/// Outcomes without a payload are skipped. Any entry failure, including two
/// entries with the same name, fails the whole export and no partial archive
/// is returned. An export that would contain no entries is an error.
pub fn export_all_with<B: ArchiveBuilder>(
    outcomes: &[ReductionOutcome],
    mut builder: B,
) -> Result<Vec<u8>> {
    let mut names = HashSet::new();

    for outcome in outcomes {
        let Some(bytes) = &outcome.payload else {
            log::warn!(
                "Skipping {} in archive: no payload available",
                outcome.source.name()
            );
            continue;
        };

        let name = outcome.export_name();
        if !names.insert(name.clone()) {
            return Err(SqueezeError::Export(format!(
                "duplicate archive entry: {}",
                name
            )));
        }

        builder.add_entry(&name, bytes)?;
        log::debug!("Added {} ({} bytes) to archive", name, bytes.len());
    }

    if names.is_empty() {
        return Err(SqueezeError::Export(
            "nothing to export: no payloads available".to_string(),
        ));
    }

    builder.finalize()
}

/// Writes each available payload into `dir` as `compressed_<name>`.
///
/// Two payloads with the same export name fail the call before anything is
/// written, as for the archive.
///
/// # Returns
/// * Paths of the written files, in outcome order
pub fn write_exports(outcomes: &[ReductionOutcome], dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::with_capacity(outcomes.len());
    let mut names = HashSet::new();

    for outcome in outcomes {
        match export_one(outcome) {
            Ok(file) => {
                if !names.insert(file.name.clone()) {
                    return Err(SqueezeError::Export(format!(
                        "duplicate output file: {}",
                        file.name
                    )));
                }
                files.push(file);
            }
            Err(e) => log::warn!("Not writing {}: {}", outcome.source.name(), e),
        }
    }

    let dir = validate_output_dir(dir)?;
    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let path = dir.join(&file.name);
        fs::write(&path, &file.bytes)?;
        written.push(path);
    }

    Ok(written)
}

/// Builds the zip archive and writes it to `path`.
pub fn write_archive(outcomes: &[ReductionOutcome], path: &Path) -> Result<u64> {
    let archive = export_all(outcomes)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        validate_output_dir(parent)?;
    }
    fs::write(path, &archive)?;

    Ok(archive.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceFile;
    use std::io::Read;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn outcome(name: &str, payload: &[u8]) -> ReductionOutcome {
        let source = SourceFile::from_bytes(name, "text/plain", payload.to_vec());
        ReductionOutcome::reduced(source, payload.to_vec().into(), payload.len() as u64, None)
    }

    fn unreadable(name: &str) -> ReductionOutcome {
        let source = SourceFile::from_bytes(name, "text/plain", vec![0u8; 3]);
        ReductionOutcome::failed(source, None, "read failed")
    }

    fn read_entries(archive: Vec<u8>) -> Vec<(String, Vec<u8>)> {
        let mut zip = ZipArchive::new(Cursor::new(archive)).unwrap();
        (0..zip.len())
            .map(|i| {
                let mut entry = zip.by_index(i).unwrap();
                let mut data = Vec::new();
                entry.read_to_end(&mut data).unwrap();
                (entry.name().to_string(), data)
            })
            .collect()
    }

    /// Fails on the entry with the given name.
    struct FailingBuilder {
        fail_on: &'static str,
        added: Vec<String>,
    }

    impl ArchiveBuilder for FailingBuilder {
        fn add_entry(&mut self, name: &str, _bytes: &[u8]) -> Result<()> {
            if name == self.fail_on {
                return Err(SqueezeError::Export(format!("cannot pack {}", name)));
            }
            self.added.push(name.to_string());
            Ok(())
        }

        fn finalize(self) -> Result<Vec<u8>> {
            Ok(self.added.join(",").into_bytes())
        }
    }

    #[test]
    fn test_export_one_uses_prefix() {
        let exported = export_one(&outcome("a.png", b"pixels")).unwrap();
        assert_eq!(exported.name, "compressed_a.png");
        assert_eq!(&exported.bytes[..], b"pixels");
    }

    #[test]
    fn test_export_one_without_payload() {
        let result = export_one(&unreadable("gone.txt"));
        assert!(matches!(result, Err(SqueezeError::Export(_))));
    }

    #[test]
    fn test_export_all_contains_every_payload_in_order() {
        let outcomes = vec![
            outcome("a.png", b"first"),
            unreadable("b.txt"),
            outcome("c.pdf", b"third"),
        ];

        let entries = read_entries(export_all(&outcomes).unwrap());
        assert_eq!(
            entries,
            vec![
                ("compressed_a.png".to_string(), b"first".to_vec()),
                ("compressed_c.pdf".to_string(), b"third".to_vec()),
            ]
        );
    }

    #[test]
    fn test_export_all_rejects_duplicate_names() {
        let outcomes = vec![outcome("same.txt", b"one"), outcome("same.txt", b"two")];
        let result = export_all(&outcomes);
        assert!(matches!(result, Err(SqueezeError::Export(msg)) if msg.contains("duplicate")));
    }

    #[test]
    fn test_export_all_with_nothing_to_export() {
        assert!(matches!(export_all(&[]), Err(SqueezeError::Export(_))));
        assert!(matches!(
            export_all(&[unreadable("x.txt")]),
            Err(SqueezeError::Export(_))
        ));
    }

    #[test]
    fn test_builder_failure_aborts_whole_export() {
        let outcomes = vec![
            outcome("a.txt", b"1"),
            outcome("b.txt", b"2"),
            outcome("c.txt", b"3"),
        ];
        let builder = FailingBuilder {
            fail_on: "compressed_b.txt",
            added: Vec::new(),
        };

        let result = export_all_with(&outcomes, builder);
        assert!(matches!(result, Err(SqueezeError::Export(_))));
    }

    #[test]
    fn test_custom_builder_sees_prefixed_names() {
        let outcomes = vec![outcome("a.txt", b"1"), outcome("b.txt", b"2")];
        let builder = FailingBuilder {
            fail_on: "never",
            added: Vec::new(),
        };

        let packed = export_all_with(&outcomes, builder).unwrap();
        assert_eq!(packed, b"compressed_a.txt,compressed_b.txt".to_vec());
    }

    #[test]
    fn test_write_exports_to_directory() {
        let temp_dir = TempDir::new().unwrap();
        let out_dir = temp_dir.path().join("out");
        let outcomes = vec![outcome("a.txt", b"alpha"), unreadable("b.txt")];

        let written = write_exports(&outcomes, &out_dir).unwrap();

        assert_eq!(written.len(), 1);
        assert_eq!(fs::read(out_dir.join("compressed_a.txt")).unwrap(), b"alpha");
        assert!(!out_dir.join("compressed_b.txt").exists());
    }

    #[test]
    fn test_write_exports_rejects_duplicate_names() {
        let temp_dir = TempDir::new().unwrap();
        let out_dir = temp_dir.path().join("out");
        let outcomes = vec![outcome("x.txt", b"first"), outcome("x.txt", b"second")];

        let result = write_exports(&outcomes, &out_dir);

        assert!(matches!(result, Err(SqueezeError::Export(msg)) if msg.contains("duplicate")));
        assert!(!out_dir.join("compressed_x.txt").exists());
    }

    #[test]
    fn test_write_archive_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("compressed_files.zip");
        let outcomes = vec![outcome("a.txt", b"alpha")];

        let size = write_archive(&outcomes, &path).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert_eq!(bytes.len() as u64, size);
        assert_eq!(read_entries(bytes)[0].0, "compressed_a.txt");
    }
}
