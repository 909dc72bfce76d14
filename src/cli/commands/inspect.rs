//! Inspect command implementation.
//!
//! Lists every entry of a package with its storage mode and sizes, and
//! warns about missing structural entries.

use crate::apk::{
    StorageMode,
    dex::DEX_PATH,
    manifest::MANIFEST_PATH,
    resources::RESOURCE_TABLE_PATH,
    signature::{MANIFEST_MF_PATH, SIGNATURE_BLOCK_PATH, SIGNATURE_FILE_PATH},
};
use crate::cli::{InspectArgs, RuntimeConfig};
use crate::error::{ErrorExt, Result};
use serde::Serialize;
use std::io::Cursor;
use zip::{CompressionMethod, ZipArchive};

const REQUIRED_ENTRIES: [&str; 6] = [
    MANIFEST_PATH,
    RESOURCE_TABLE_PATH,
    DEX_PATH,
    MANIFEST_MF_PATH,
    SIGNATURE_FILE_PATH,
    SIGNATURE_BLOCK_PATH,
];

/// One row of the listing.
#[derive(Debug, Clone, Serialize)]
struct EntryInfo {
    path: String,
    storage: String,
    size: u64,
    compressed_size: u64,
}

/// Execute inspect command; exit code 1 when a structural entry is missing,
/// in either output mode.
pub(super) async fn execute_inspect(args: &InspectArgs, config: &RuntimeConfig) -> Result<i32> {
    let bytes = tokio::fs::read(&args.package)
        .await
        .fs_context("reading package", &args.package)?;
    let entries = list_entries(&bytes)?;
    let missing = missing_entries(&entries);
    let exit_code = if missing.is_empty() { 0 } else { 1 };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        for path in &missing {
            log::warn!("Missing {}", path);
        }
        return Ok(exit_code);
    }

    let output = config.output();
    let _ = output.info(&format!(
        "{} ({} entries, {} bytes)",
        args.package.display(),
        entries.len(),
        bytes.len()
    ));
    for entry in &entries {
        let _ = output.indent(&format!(
            "{:<8} {:>10} {:>10}  {}",
            entry.storage, entry.size, entry.compressed_size, entry.path
        ));
    }

    for path in &missing {
        let _ = output.warn(&format!("Missing {}", path));
    }

    Ok(exit_code)
}

/// Structural entries absent from `entries`, in canonical order.
fn missing_entries(entries: &[EntryInfo]) -> Vec<&'static str> {
    REQUIRED_ENTRIES
        .into_iter()
        .filter(|required| !entries.iter().any(|e| e.path == *required))
        .collect()
}

fn list_entries(bytes: &[u8]) -> Result<Vec<EntryInfo>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut entries = Vec::with_capacity(archive.len());

    for index in 0..archive.len() {
        let file = archive.by_index(index)?;
        let storage = match file.compression() {
            CompressionMethod::Stored => StorageMode::Stored.to_string(),
            CompressionMethod::Deflated => StorageMode::Deflated.to_string(),
            other => format!("{other:?}").to_lowercase(),
        };
        entries.push(EntryInfo {
            path: file.name().to_string(),
            storage,
            size: file.size(),
            compressed_size: file.compressed_size(),
        });
    }

    Ok(entries)
}
