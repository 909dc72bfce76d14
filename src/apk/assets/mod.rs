//! Web asset tree handling.
//!
//! The uploaded site arrives as a ZIP archive. [`validator`] checks it for an
//! entry point without extracting anything, [`AssetTree::from_archive`]
//! extracts it into memory, and [`viewport`] rewrites its markup.

pub mod validator;
pub mod viewport;

use crate::apk::{
    error::{Error, Result},
    settings::AssetSettings,
};
use std::collections::HashSet;
use std::io::{Cursor, Read};

/// File name of the contractual entry point.
pub const ENTRY_POINT: &str = "index.html";

/// One file from the uploaded site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFile {
    /// Relative, forward-slash path inside the site.
    pub path: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// Ordered set of site files, in archive order.
///
/// Paths are relative, unique and never escape the tree root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetTree {
    files: Vec<AssetFile>,
}

impl AssetTree {
    /// Build a tree from already-extracted files.
    ///
    /// Applies the same path rules as [`AssetTree::from_archive`].
    pub fn from_files(files: impl IntoIterator<Item = (String, Vec<u8>)>) -> Result<Self> {
        let mut tree = Self::default();
        let mut seen = HashSet::new();
        for (path, bytes) in files {
            tree.insert(&mut seen, path, bytes)?;
        }
        Ok(tree)
    }

    /// Extract every file entry of a ZIP archive.
    ///
    /// Directory entries are skipped. The entry count and total uncompressed
    /// size are checked against `settings` before and during extraction.
    ///
    /// # Errors
    ///
    /// - [`Error::CorruptArchive`] if the archive or an entry cannot be read
    /// - [`Error::InvalidAssetPath`] for absolute, escaping or duplicate paths
    /// - [`Error::AssetLimitExceeded`] if a limit is hit
    pub fn from_archive(archive_bytes: &[u8], settings: &AssetSettings) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(Cursor::new(archive_bytes)).map_err(Error::corrupt)?;
        if archive.len() > settings.max_entries {
            return Err(Error::AssetLimitExceeded {
                what: "entry count",
                limit: settings.max_entries as u64,
            });
        }

        let mut tree = Self::default();
        let mut seen = HashSet::new();
        let mut total: u64 = 0;

        for index in 0..archive.len() {
            let file = archive.by_index(index).map_err(Error::corrupt)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();

            // Declared sizes can lie; cap the reader one byte past the budget.
            let remaining = settings.max_total_bytes.saturating_sub(total);
            let mut bytes = Vec::new();
            file.take(remaining + 1)
                .read_to_end(&mut bytes)
                .map_err(Error::corrupt)?;
            total += bytes.len() as u64;
            if total > settings.max_total_bytes {
                return Err(Error::AssetLimitExceeded {
                    what: "uncompressed size",
                    limit: settings.max_total_bytes,
                });
            }

            tree.insert(&mut seen, name, bytes)?;
        }

        Ok(tree)
    }

    fn insert(&mut self, seen: &mut HashSet<String>, path: String, bytes: Vec<u8>) -> Result<()> {
        check_relative_path(&path)?;
        if !seen.insert(path.clone()) {
            return Err(Error::InvalidAssetPath {
                path,
                reason: "duplicate entry",
            });
        }
        self.files.push(AssetFile { path, bytes });
        Ok(())
    }

    /// Files in archive order.
    pub fn files(&self) -> &[AssetFile] {
        &self.files
    }

    /// Look up a file by exact path.
    pub fn get(&self, path: &str) -> Option<&AssetFile> {
        self.files.iter().find(|f| f.path == path)
    }

    /// Number of files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the tree holds no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Path of the entry point: root `index.html`, else the only
    /// `<dir>/index.html` one level down. Several wrapped candidates and no
    /// root one means there is no entry point.
    pub fn entry_point(&self) -> Option<&str> {
        let paths = || self.files.iter().map(|f| f.path.as_str());
        if let Some(root) = paths().find(|p| *p == ENTRY_POINT) {
            return Some(root);
        }
        let mut wrapped = paths().filter(|p| validator::is_entry_point(p));
        match (wrapped.next(), wrapped.next()) {
            (Some(only), None) => Some(only),
            _ => None,
        }
    }

    /// Apply `f` to every file, producing a new tree with identical paths.
    pub(crate) fn map_files(self, mut f: impl FnMut(&str, Vec<u8>) -> Vec<u8>) -> Self {
        let files = self
            .files
            .into_iter()
            .map(|AssetFile { path, bytes }| {
                let bytes = f(&path, bytes);
                AssetFile { path, bytes }
            })
            .collect();
        Self { files }
    }
}

impl IntoIterator for AssetTree {
    type Item = AssetFile;
    type IntoIter = std::vec::IntoIter<AssetFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_iter()
    }
}

/// Reject paths that are absolute, use backslashes or step outside the root.
fn check_relative_path(path: &str) -> Result<()> {
    let reject = |reason| {
        Err(Error::InvalidAssetPath {
            path: path.to_string(),
            reason,
        })
    };

    if path.is_empty() {
        return reject("empty path");
    }
    if path.starts_with('/') || path.contains(':') {
        return reject("absolute path");
    }
    if path.contains('\\') {
        return reject("backslash separator");
    }
    for component in path.split('/') {
        match component {
            "" => return reject("empty path component"),
            "." | ".." => return reject("relative path component"),
            _ => {}
        }
    }
    Ok(())
}
