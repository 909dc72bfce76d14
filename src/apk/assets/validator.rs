//! Entry point validation for uploaded site archives.
//!
//! Only the central directory is read; no entry is decompressed.

use crate::apk::{
    assets::ENTRY_POINT,
    error::{Error, Result},
};
use std::io::Cursor;

/// Check that `archive_bytes` is a ZIP containing a usable entry point.
///
/// The entry point is `index.html` at the root, or `<dir>/index.html` where
/// `<dir>` is a single wrapper directory.
///
/// # Errors
///
/// - [`Error::CorruptArchive`] if the bytes are not a readable ZIP
/// - [`Error::MissingEntryPoint`] if no entry point is listed
pub fn validate(archive_bytes: &[u8]) -> Result<()> {
    let archive = zip::ZipArchive::new(Cursor::new(archive_bytes)).map_err(Error::corrupt)?;

    if archive.file_names().any(is_entry_point) {
        Ok(())
    } else {
        Err(Error::MissingEntryPoint)
    }
}

/// Whether an entry name is an acceptable entry point location.
pub fn is_entry_point(name: &str) -> bool {
    match name.split_once('/') {
        None => name == ENTRY_POINT,
        Some((dir, rest)) => !dir.is_empty() && rest == ENTRY_POINT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apk::assets::test_support::zip_of;
    use crate::apk::error::ErrorKind;

    #[test]
    fn test_root_entry_point() {
        let bytes = zip_of(&[("index.html", b"<html></html>"), ("style.css", b"")]);
        assert!(validate(&bytes).is_ok());
    }

    #[test]
    fn test_single_wrapper_directory() {
        let bytes = zip_of(&[("site/", b""), ("site/index.html", b"")]);
        assert!(validate(&bytes).is_ok());
    }

    #[test]
    fn test_nested_too_deep() {
        let bytes = zip_of(&[("a/b/index.html", b"")]);
        assert_eq!(validate(&bytes).unwrap_err().kind(), ErrorKind::MissingEntryPoint);
    }

    #[test]
    fn test_missing_entry_point() {
        let bytes = zip_of(&[("home.html", b""), ("index.htm", b"")]);
        assert!(matches!(validate(&bytes), Err(Error::MissingEntryPoint)));
    }

    #[test]
    fn test_corrupt_archive() {
        let err = validate(b"definitely not a zip").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptArchive);
    }

    #[test]
    fn test_is_entry_point() {
        assert!(is_entry_point("index.html"));
        assert!(is_entry_point("www/index.html"));
        assert!(!is_entry_point("/index.html"));
        assert!(!is_entry_point("a/b/index.html"));
        assert!(!is_entry_point("INDEX.html"));
        assert!(!is_entry_point("myindex.html"));
    }
}
