//! Container entries and deterministic ZIP serialization.
//!
//! A [`Container`] is filled once, serialized once with
//! [`Container::into_bytes`], and discarded. Serialization pins every
//! variable ZIP field (timestamp, permissions, compression level) so the
//! same entries always produce the same bytes.

use crate::apk::error::{AssemblyCause, Error, Result, StageContext};
use std::collections::HashSet;
use std::fmt;
use std::io::{Cursor, Write};
use zip::{CompressionMethod, DateTime, ZipWriter, write::SimpleFileOptions};

/// Alignment of uncompressed entry data, matching `zipalign 4`.
const STORED_ALIGNMENT: u16 = 4;

/// How an entry's bytes are stored in the container.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum StorageMode {
    /// Uncompressed, 4-byte aligned.
    Stored,
    /// Deflate at maximum level.
    Deflated,
}

impl StorageMode {
    fn options(self) -> SimpleFileOptions {
        let base = SimpleFileOptions::default()
            .last_modified_time(DateTime::default())
            .unix_permissions(0o644);
        match self {
            StorageMode::Stored => base
                .compression_method(CompressionMethod::Stored)
                .with_alignment(STORED_ALIGNMENT),
            StorageMode::Deflated => base
                .compression_method(CompressionMethod::Deflated)
                .compression_level(Some(9)),
        }
    }
}

impl fmt::Display for StorageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageMode::Stored => f.write_str("stored"),
            StorageMode::Deflated => f.write_str("deflated"),
        }
    }
}

/// One named byte sequence inside the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerEntry {
    /// Case-sensitive, forward-slash path.
    pub path: String,
    /// Entry contents.
    pub bytes: Vec<u8>,
    /// Compression policy.
    pub storage: StorageMode,
}

impl ContainerEntry {
    /// Uncompressed entry.
    pub fn stored(path: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            bytes,
            storage: StorageMode::Stored,
        }
    }

    /// Deflated entry.
    pub fn deflated(path: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            bytes,
            storage: StorageMode::Deflated,
        }
    }
}

/// Ordered collection of entries with unique paths.
#[derive(Debug, Default)]
pub struct Container {
    entries: Vec<ContainerEntry>,
    paths: HashSet<String>,
}

impl Container {
    /// Empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    ///
    /// # Errors
    ///
    /// [`Error::Assembly`] with [`AssemblyCause::DuplicateEntry`] if the
    /// path is already present.
    pub fn push(&mut self, entry: ContainerEntry) -> Result<()> {
        if !self.paths.insert(entry.path.clone()) {
            return Err(Error::Assembly {
                stage: "adding entry",
                cause: AssemblyCause::DuplicateEntry(entry.path),
            });
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Append several entries in order.
    pub fn extend(&mut self, entries: impl IntoIterator<Item = ContainerEntry>) -> Result<()> {
        entries.into_iter().try_for_each(|entry| self.push(entry))
    }

    /// Entries in write order.
    pub fn entries(&self) -> &[ContainerEntry] {
        &self.entries
    }

    /// Serialize all entries, in order, into a ZIP byte sequence.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        let capacity = self.entries.iter().map(|e| e.bytes.len()).sum::<usize>() + 4096;
        let mut zip = ZipWriter::new(Cursor::new(Vec::with_capacity(capacity)));

        for entry in self.entries {
            zip.start_file(entry.path, entry.storage.options())
                .stage("starting container entry")?;
            zip.write_all(&entry.bytes)
                .stage("writing container entry")?;
        }

        let cursor = zip.finish().stage("finishing container")?;
        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn sample() -> Container {
        let mut container = Container::new();
        container
            .push(ContainerEntry::stored("a.bin", vec![1, 2, 3]))
            .unwrap();
        container
            .push(ContainerEntry::deflated("dir/b.txt", b"hello hello hello".to_vec()))
            .unwrap();
        container
    }

    #[test]
    fn test_duplicate_path_rejected() {
        let mut container = sample();
        let err = container
            .push(ContainerEntry::stored("a.bin", vec![]))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Assembly {
                cause: AssemblyCause::DuplicateEntry(_),
                ..
            }
        ));
        assert_eq!(container.entries().len(), 2);
    }

    #[test]
    fn test_serialization_is_deterministic() {
        assert_eq!(sample().into_bytes().unwrap(), sample().into_bytes().unwrap());
    }

    #[test]
    fn test_storage_modes_and_order_preserved() {
        let bytes = sample().into_bytes().unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);

        let first = archive.by_index(0).unwrap();
        assert_eq!(first.name(), "a.bin");
        assert_eq!(first.compression(), CompressionMethod::Stored);
        drop(first);

        let mut second = archive.by_index(1).unwrap();
        assert_eq!(second.name(), "dir/b.txt");
        assert_eq!(second.compression(), CompressionMethod::Deflated);
        let mut text = String::new();
        second.read_to_string(&mut text).unwrap();
        assert_eq!(text, "hello hello hello");
    }
}
