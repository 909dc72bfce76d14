//! Build configuration table.
//!
//! [`BuildConfig`] holds every fixed value the pipeline needs: the package
//! namespace, SDK levels, permissions, density buckets, stub sizes and the
//! digest algorithm. It is constructed once, never mutated, and shared by
//! reference across builds.
//!
//! # Configuration
//!
//! All sections are optional in TOML; missing keys keep their defaults:
//!
//! ```toml
//! [identity]
//! namespace = "com.example.web"
//!
//! [manifest]
//! min_sdk = 21
//! target_sdk = 33
//!
//! [signature]
//! algorithm = "sha1"
//! ```

use crate::apk::assets::viewport;
use crate::error::{AppError, Result as AppResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Complete, read-only configuration for one assembler.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Package identifier derivation.
    pub identity: IdentitySettings,
    /// Application descriptor contents.
    pub manifest: ManifestSettings,
    /// Resource table and icon buckets.
    pub resources: ResourceSettings,
    /// Executable-code placeholder.
    pub code_stub: CodeStubSettings,
    /// Integrity entries.
    pub signature: SignatureSettings,
    /// Asset tree extraction and placement.
    pub assets: AssetSettings,
}

impl BuildConfig {
    /// Load a configuration from a TOML file.
    ///
    /// Sections and keys not present in the file keep their defaults.
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|error| AppError::Config {
            path: path.to_path_buf(),
            reason: error.to_string(),
        })?;
        Self::from_toml(&content).map_err(|error| match error {
            AppError::Toml(e) => AppError::Config {
                path: path.to_path_buf(),
                reason: e.to_string(),
            },
            AppError::Config { reason, .. } => AppError::Config {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })
    }

    /// Parse a configuration from TOML text and check it with [`BuildConfig::validate`].
    pub fn from_toml(content: &str) -> AppResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate().map_err(|reason| AppError::Config {
            path: PathBuf::new(),
            reason,
        })?;
        Ok(config)
    }

    /// Reject values that would break the package id pattern, produce
    /// absolute container paths or make viewport injection non-idempotent.
    pub fn validate(&self) -> Result<(), String> {
        let identity = &self.identity;
        let namespace_ok = identity.namespace.is_empty()
            || identity.namespace.split('.').all(|part| {
                part.starts_with(|c: char| c.is_ascii_lowercase()) && is_id_segment(part)
            });
        if !namespace_ok {
            return Err(format!(
                "identity.namespace {:?} must be dot-separated [a-z][a-z0-9_]* segments",
                identity.namespace
            ));
        }
        if identity.fallback_token.is_empty() || !is_id_segment(&identity.fallback_token) {
            return Err(format!(
                "identity.fallback_token {:?} must be non-empty [a-z0-9_]",
                identity.fallback_token
            ));
        }

        let prefix = &self.assets.prefix;
        if prefix.trim_end_matches('/').is_empty()
            || prefix.starts_with('/')
            || prefix.contains('\\')
            || prefix.split('/').any(|part| part == "..")
        {
            return Err(format!(
                "assets.prefix {prefix:?} must be a non-empty relative path"
            ));
        }

        if !viewport::declares_viewport(&self.assets.viewport_tag) {
            return Err(format!(
                "assets.viewport_tag {:?} is not a viewport meta tag",
                self.assets.viewport_tag
            ));
        }

        Ok(())
    }
}

fn is_id_segment(segment: &str) -> bool {
    segment
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// How the package identifier is derived from the display name.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdentitySettings {
    /// Reverse-domain prefix, e.g. `com.htmltoapp`.
    pub namespace: String,
    /// Maximum length of the sanitized name segment.
    pub max_name_len: usize,
    /// Segment used when the name sanitizes to nothing.
    pub fallback_token: String,
}

impl Default for IdentitySettings {
    fn default() -> Self {
        Self {
            namespace: "com.htmltoapp".into(),
            max_name_len: 20,
            fallback_token: "app".into(),
        }
    }
}

/// Values written into `AndroidManifest.xml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManifestSettings {
    /// `android:minSdkVersion`
    pub min_sdk: u32,
    /// `android:targetSdkVersion`
    pub target_sdk: u32,
    /// Requested permissions, in declaration order.
    pub permissions: Vec<String>,
    /// Fully qualified launcher activity class.
    pub activity: String,
    /// Resource reference used for the application icon.
    pub icon_ref: String,
    /// `android:name` of the meta-data element carrying the entry point path.
    pub entry_point_key: String,
}

impl Default for ManifestSettings {
    fn default() -> Self {
        Self {
            min_sdk: 19,
            target_sdk: 30,
            permissions: vec![
                "android.permission.INTERNET".into(),
                "android.permission.ACCESS_NETWORK_STATE".into(),
            ],
            activity: "com.htmltoapp.MainActivity".into(),
            icon_ref: "@drawable/icon".into(),
            entry_point_key: "webapk.entry_point".into(),
        }
    }
}

/// One icon density bucket.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DensityBucket {
    /// Resource directory name, e.g. `drawable-hdpi`.
    pub name: String,
    /// Square edge length in pixels.
    pub pixel_size: u32,
}

impl DensityBucket {
    fn new(name: &str, pixel_size: u32) -> Self {
        Self {
            name: name.into(),
            pixel_size,
        }
    }
}

/// Resource table and icon layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResourceSettings {
    /// Density buckets, in the order their entries are written.
    pub buckets: Vec<DensityBucket>,
    /// File name of the icon inside each bucket directory.
    pub icon_file_name: String,
}

impl Default for ResourceSettings {
    fn default() -> Self {
        Self {
            buckets: vec![
                DensityBucket::new("drawable-ldpi", 36),
                DensityBucket::new("drawable-mdpi", 48),
                DensityBucket::new("drawable-hdpi", 72),
                DensityBucket::new("drawable-xhdpi", 96),
                DensityBucket::new("drawable-xxhdpi", 144),
                DensityBucket::new("drawable-xxxhdpi", 192),
            ],
            icon_file_name: "icon.png".into(),
        }
    }
}

/// Code placeholder layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodeStubSettings {
    /// Minimum size of `classes.dex` in bytes. Never below the header size.
    pub min_size: usize,
}

impl Default for CodeStubSettings {
    fn default() -> Self {
        Self { min_size: 4096 }
    }
}

/// Digest algorithm used by the signature entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    /// SHA-1, as written by legacy jarsigner.
    Sha1,
    /// SHA-256.
    #[default]
    Sha256,
}

impl DigestAlgorithm {
    /// Attribute name prefix used in JAR manifests, e.g. `SHA-256`.
    pub fn jar_name(&self) -> &'static str {
        match self {
            DigestAlgorithm::Sha1 => "SHA1",
            DigestAlgorithm::Sha256 => "SHA-256",
        }
    }

    /// Hash `data` with this algorithm.
    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        use sha2::Digest;
        match self {
            DigestAlgorithm::Sha1 => sha1::Sha1::digest(data).to_vec(),
            DigestAlgorithm::Sha256 => sha2::Sha256::digest(data).to_vec(),
        }
    }
}

/// Signature entry contents.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SignatureSettings {
    /// Digest algorithm for the digest manifest and signature file.
    pub algorithm: DigestAlgorithm,
    /// `Created-By` attribute value.
    pub created_by: String,
    /// Size of the certificate placeholder block.
    pub block_size: usize,
}

impl Default for SignatureSettings {
    fn default() -> Self {
        Self {
            algorithm: DigestAlgorithm::Sha256,
            created_by: "1.0 (kodegen webapk)".into(),
            block_size: 1024,
        }
    }
}

/// Asset tree extraction limits and placement.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetSettings {
    /// Prefix every asset path is re-rooted under. Must end with `/`.
    pub prefix: String,
    /// Maximum number of entries accepted from the upload.
    pub max_entries: usize,
    /// Maximum total uncompressed size accepted from the upload.
    pub max_total_bytes: u64,
    /// Tag inserted after `<head>` in markup lacking one.
    pub viewport_tag: String,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            prefix: "assets/www/".into(),
            max_entries: 10_000,
            max_total_bytes: 256 * 1024 * 1024,
            viewport_tag: r#"<meta name="viewport" content="width=device-width, initial-scale=1.0, maximum-scale=1.0, user-scalable=no">"#.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = BuildConfig::from_toml(
            r#"
            [manifest]
            min_sdk = 21

            [signature]
            algorithm = "sha1"
            "#,
        )
        .unwrap();

        assert_eq!(config.manifest.min_sdk, 21);
        assert_eq!(config.manifest.target_sdk, 30);
        assert_eq!(config.signature.algorithm, DigestAlgorithm::Sha1);
        assert_eq!(config.resources.buckets.len(), 6);
        assert_eq!(config.identity.namespace, "com.htmltoapp");
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(BuildConfig::from_toml("[manifest]\nbogus = 1\n").is_err());
    }

    fn config_error(content: &str) -> String {
        match BuildConfig::from_toml(content) {
            Err(AppError::Config { reason, .. }) => reason,
            other => panic!("expected a configuration error, got {other:?}"),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(BuildConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_namespace_rejected() {
        let reason = config_error("[identity]\nnamespace = \"Com.Example-Web\"\n");
        assert!(reason.contains("identity.namespace"));
        assert!(BuildConfig::from_toml("[identity]\nnamespace = \"org.example.web_2\"\n").is_ok());
    }

    #[test]
    fn test_invalid_fallback_token_rejected() {
        let reason = config_error("[identity]\nfallback_token = \"App!\"\n");
        assert!(reason.contains("identity.fallback_token"));
    }

    #[test]
    fn test_empty_or_absolute_prefix_rejected() {
        assert!(config_error("[assets]\nprefix = \"\"\n").contains("assets.prefix"));
        assert!(config_error("[assets]\nprefix = \"/www/\"\n").contains("assets.prefix"));
        assert!(BuildConfig::from_toml("[assets]\nprefix = \"assets/site\"\n").is_ok());
    }

    #[test]
    fn test_non_viewport_tag_rejected() {
        let reason = config_error("[assets]\nviewport_tag = '<meta charset=\"utf-8\">'\n");
        assert!(reason.contains("assets.viewport_tag"));
    }

    #[test]
    fn test_load_reports_file_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("webapk.toml");
        std::fs::write(&path, "[assets]\nprefix = \"\"\n").unwrap();
        match BuildConfig::load(&path) {
            Err(AppError::Config { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected a configuration error, got {other:?}"),
        }
    }

    #[test]
    fn test_digest_lengths() {
        assert_eq!(DigestAlgorithm::Sha1.digest(b"abc").len(), 20);
        assert_eq!(DigestAlgorithm::Sha256.digest(b"abc").len(), 32);
    }
}
