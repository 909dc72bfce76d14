//! Application identity derived from user-supplied metadata.
//!
//! Turns a free-form display name and version into a package identifier,
//! a numeric version code and a filesystem-safe artifact name.

use crate::apk::{
    error::{Error, Result},
    settings::IdentitySettings,
};

/// Identity of the application being packaged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppIdentity {
    display_name: String,
    version: String,
    package_id: String,
}

impl AppIdentity {
    /// Build an identity, deriving the package identifier from `display_name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMetadata`] if either value is blank.
    pub fn new(display_name: &str, version: &str, settings: &IdentitySettings) -> Result<Self> {
        let display_name = display_name.trim();
        let version = version.trim();
        if display_name.is_empty() {
            return Err(Error::InvalidMetadata {
                field: "name",
                reason: "must not be empty".into(),
            });
        }
        if version.is_empty() {
            return Err(Error::InvalidMetadata {
                field: "version",
                reason: "must not be empty".into(),
            });
        }

        Ok(Self {
            package_id: derive_package_id(display_name, settings),
            display_name: display_name.to_string(),
            version: version.to_string(),
        })
    }

    /// Human-readable application label.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Version string as supplied (`versionName`).
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Reverse-domain package identifier.
    pub fn package_id(&self) -> &str {
        &self.package_id
    }

    /// Integer `versionCode` derived from the version string.
    ///
    /// `major * 10000 + minor * 100 + patch`, with missing components taken
    /// as zero. Anything that does not parse as a version yields `1`.
    pub fn version_code(&self) -> u32 {
        let core = self
            .version
            .trim_start_matches(['v', 'V'])
            .split(['-', '+'])
            .next()
            .unwrap_or_default();
        let mut parts: Vec<&str> = core.split('.').collect();
        if parts.len() > 3 {
            return 1;
        }
        while parts.len() < 3 {
            parts.push("0");
        }

        match semver::Version::parse(&parts.join(".")) {
            Ok(v) => v
                .major
                .checked_mul(10_000)
                .and_then(|code| code.checked_add(v.minor.min(99) * 100 + v.patch.min(99)))
                .and_then(|code| u32::try_from(code).ok())
                .filter(|code| *code > 0)
                .unwrap_or(1),
            Err(_) => 1,
        }
    }

    /// File name for the produced container, e.g. `My_App_v1.0.apk`.
    pub fn artifact_file_name(&self) -> String {
        let stem = format!("{}_v{}", self.display_name.replace(' ', "_"), self.version);
        let safe: String = stem
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!("{safe}.apk")
    }
}

/// Derive `<namespace>.<segment>` from a display name.
///
/// The segment is the lower-cased name with whitespace, hyphens and dots
/// removed, restricted to `[a-z0-9_]`, truncated, and guaranteed to start
/// with a letter.
pub fn derive_package_id(display_name: &str, settings: &IdentitySettings) -> String {
    let mut segment: String = display_name
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '.')
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .take(settings.max_name_len)
        .collect();

    if segment.is_empty() {
        segment = settings.fallback_token.clone();
    }
    if !segment.starts_with(|c: char| c.is_ascii_lowercase()) {
        segment.insert_str(0, "app");
    }

    if settings.namespace.is_empty() {
        segment
    } else {
        format!("{}.{}", settings.namespace, segment)
    }
}
