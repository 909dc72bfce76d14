//! Build command implementation.
//!
//! Reads the site archive and icon, assembles the package on a blocking
//! thread and writes it next to (or at) the requested output path.

use crate::apk::AppIdentity;
use crate::cli::{BuildArgs, RuntimeConfig};
use crate::error::{ErrorExt, Result};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Execute build command
pub(super) async fn execute_build(args: &BuildArgs, config: &RuntimeConfig) -> Result<i32> {
    let output = config.output();
    let assembler = config.assembler().clone();

    let identity = AppIdentity::new(&args.name, &args.app_version, &assembler.config().identity)?;
    let _ = output.info(&format!(
        "Building {} {} ({})",
        identity.display_name(),
        identity.version(),
        identity.package_id()
    ));

    let site = tokio::fs::read(&args.assets)
        .await
        .fs_context("reading site archive", &args.assets)?;
    let icon = tokio::fs::read(&args.icon)
        .await
        .fs_context("reading icon", &args.icon)?;
    let _ = output.verbose(&format!(
        "Site archive {} bytes, icon {} bytes",
        site.len(),
        icon.len()
    ));

    let task_identity = identity.clone();
    let apk = tokio::task::spawn_blocking(move || {
        assembler.assemble(&task_identity, &site, &icon)
    })
    .await??;

    let destination = resolve_destination(args.output.as_deref(), &identity.artifact_file_name()).await;
    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .fs_context("creating output directory", parent)?;
    }
    tokio::fs::write(&destination, &apk)
        .await
        .fs_context("writing package", &destination)?;

    log::info!("Wrote {} ({} bytes)", destination.display(), apk.len());
    let _ = output.success(&format!("Package written to {}", destination.display()));
    let _ = output.indent(&format!("Size:       {} bytes", apk.len()));
    let _ = output.indent(&format!("Version:    {} (code {})", identity.version(), identity.version_code()));
    let _ = output.indent(&format!("SHA-256:    {}", hex::encode(Sha256::digest(&apk))));
    let _ = output.warn("Placeholder code and signature; compile and sign before installing");

    Ok(0)
}

/// Output path: `output` itself, `output/<file_name>` for a directory, or
/// `<file_name>` in the working directory.
async fn resolve_destination(output: Option<&Path>, file_name: &str) -> PathBuf {
    match output {
        None => PathBuf::from(file_name),
        Some(path) => {
            let is_dir = tokio::fs::metadata(path)
                .await
                .map(|m| m.is_dir())
                .unwrap_or(false);
            if is_dir {
                path.join(file_name)
            } else {
                path.to_path_buf()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolve_destination() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            resolve_destination(None, "A_v1.apk").await,
            PathBuf::from("A_v1.apk")
        );
        assert_eq!(
            resolve_destination(Some(dir.path()), "A_v1.apk").await,
            dir.path().join("A_v1.apk")
        );
        let file = dir.path().join("custom.apk");
        assert_eq!(resolve_destination(Some(&file), "A_v1.apk").await, file);
    }
}
