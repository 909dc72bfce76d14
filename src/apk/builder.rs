//! Container assembly.
//!
//! [`Assembler`] runs the whole pipeline for one build:
//!
//! 1. Validate the site archive and extract it
//! 2. Decode the icon and render the density buckets
//! 3. Inject viewport metadata into markup
//! 4. Encode manifest, resource table, code stub
//! 5. Re-root site files under the asset prefix
//! 6. Digest everything into the signature entries
//! 7. Serialize the container
//!
//! Every input check happens before serialization starts, so a failed build
//! never yields partial output. Entry order is fixed:
//!
//! | # | Entries | Storage |
//! |---|---------|---------|
//! | 1 | `AndroidManifest.xml` | stored |
//! | 2 | `resources.arsc` | stored |
//! | 3 | `res/<bucket>/icon.png` | deflated |
//! | 4 | `classes.dex` | stored |
//! | 5 | `assets/www/<path>` | deflated |
//! | 6 | `META-INF/MANIFEST.MF`, `CERT.SF`, `CERT.RSA` | stored |
//!
//! # Example
//!
//! ```no_run
//! use kodegen_bundler_webapk::apk::{AppIdentity, Assembler, BuildConfig};
//!
//! # fn example(site_zip: &[u8], icon_png: &[u8]) -> kodegen_bundler_webapk::apk::Result<()> {
//! let assembler = Assembler::new(BuildConfig::default());
//! let identity = AppIdentity::new("My App", "1.0", &assembler.config().identity)?;
//! let apk = assembler.assemble(&identity, site_zip, icon_png)?;
//! std::fs::write(identity.artifact_file_name(), apk).ok();
//! # Ok(())
//! # }
//! ```

use crate::apk::{
    assets::{AssetTree, validator, viewport},
    container::{Container, ContainerEntry},
    dex::CodeStubGenerator,
    error::{Error, Result},
    manifest::ManifestEncoder,
    metadata::AppIdentity,
    resources::ResourceTableBuilder,
    settings::BuildConfig,
    signature::SignatureBlockWriter,
};

/// Directory Android exposes through `file:///android_asset/`.
const ANDROID_ASSET_ROOT: &str = "assets/";

/// Builds containers from a fixed configuration.
///
/// Holds no per-build state; one instance can serve any number of builds,
/// including concurrently from several threads.
#[derive(Debug, Clone, Default)]
pub struct Assembler {
    config: BuildConfig,
}

impl Assembler {
    /// Create an assembler. The asset prefix is normalized to end with `/`.
    pub fn new(mut config: BuildConfig) -> Self {
        if !config.assets.prefix.ends_with('/') {
            config.assets.prefix.push('/');
        }
        Self { config }
    }

    /// The configuration table in use.
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Build a container from a zipped site and an icon image.
    ///
    /// # Errors
    ///
    /// - [`Error::CorruptArchive`] / [`Error::MissingEntryPoint`] from validation
    /// - [`Error::InvalidAssetPath`] / [`Error::AssetLimitExceeded`] from extraction
    /// - [`Error::IconDecode`] if the icon cannot be decoded
    /// - [`Error::Assembly`] if encoding or writing fails
    pub fn assemble(&self, identity: &AppIdentity, asset_archive: &[u8], icon: &[u8]) -> Result<Vec<u8>> {
        validator::validate(asset_archive)?;
        let tree = AssetTree::from_archive(asset_archive, &self.config.assets)?;
        self.assemble_tree(identity, tree, icon)
    }

    /// Build a container from an already extracted site.
    pub fn assemble_tree(&self, identity: &AppIdentity, tree: AssetTree, icon: &[u8]) -> Result<Vec<u8>> {
        self.collect_entries(identity, tree, icon)?.into_bytes()
    }

    /// Produce every entry, in write order, without serializing.
    pub fn collect_entries(&self, identity: &AppIdentity, tree: AssetTree, icon: &[u8]) -> Result<Container> {
        let config = &self.config;
        let prefix = &config.assets.prefix;

        let entry_point = format!("{prefix}{}", tree.entry_point().ok_or(Error::MissingEntryPoint)?);
        let entry_point = entry_point
            .strip_prefix(ANDROID_ASSET_ROOT)
            .unwrap_or(&entry_point);

        let resources = ResourceTableBuilder::new(&config.resources).build(icon)?;
        let manifest = ManifestEncoder::new(&config.manifest).encode(identity, entry_point)?;
        let tree = viewport::inject(tree, &config.assets.viewport_tag);

        let mut container = Container::new();
        container.push(manifest)?;
        container.extend(resources)?;
        container.push(CodeStubGenerator::new(&config.code_stub).generate())?;
        container.extend(
            tree.into_iter()
                .map(|file| ContainerEntry::deflated(format!("{prefix}{}", file.path), file.bytes)),
        )?;

        let signature = SignatureBlockWriter::new(&config.signature).write(container.entries());
        container.extend(signature)?;

        Ok(container)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apk::assets::test_support::zip_of;
    use crate::apk::error::ErrorKind;
    use crate::apk::resources::icons::test_support::png;

    fn identity() -> AppIdentity {
        AppIdentity::new("TestApp", "1.0", &BuildConfig::default().identity).unwrap()
    }

    #[test]
    fn test_entry_order() {
        let tree = AssetTree::from_files([
            ("index.html".to_string(), b"<head></head>".to_vec()),
            ("js/app.js".to_string(), b"1".to_vec()),
        ])
        .unwrap();
        let container = Assembler::default()
            .collect_entries(&identity(), tree, &png(64))
            .unwrap();
        let paths: Vec<_> = container.entries().iter().map(|e| e.path.as_str()).collect();

        assert_eq!(paths[0], "AndroidManifest.xml");
        assert_eq!(paths[1], "resources.arsc");
        assert!(paths[2..8].iter().all(|p| p.starts_with("res/")));
        assert_eq!(paths[8], "classes.dex");
        assert_eq!(&paths[9..11], ["assets/www/index.html", "assets/www/js/app.js"]);
        assert_eq!(
            &paths[11..],
            ["META-INF/MANIFEST.MF", "META-INF/CERT.SF", "META-INF/CERT.RSA"]
        );
    }

    #[test]
    fn test_wrapped_entry_point_in_manifest() {
        let tree = AssetTree::from_files([("site/index.html".to_string(), b"<p>".to_vec())]).unwrap();
        let container = Assembler::default()
            .collect_entries(&identity(), tree, &png(16))
            .unwrap();
        let manifest = std::str::from_utf8(&container.entries()[0].bytes).unwrap();
        assert!(manifest.contains(r#"android:value="www/site/index.html""#));
    }

    #[test]
    fn test_prefix_normalized() {
        let mut config = BuildConfig::default();
        config.assets.prefix = "assets/site".into();
        assert_eq!(Assembler::new(config).config().assets.prefix, "assets/site/");
    }

    #[test]
    fn test_missing_entry_point_rejected() {
        let archive = zip_of(&[("about.html", b"")]);
        let err = Assembler::default()
            .assemble(&identity(), &archive, &png(16))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingEntryPoint);
    }

    #[test]
    fn test_bad_icon_rejected_before_output() {
        let archive = zip_of(&[("index.html", b"<head></head>")]);
        let err = Assembler::default()
            .assemble(&identity(), &archive, b"not an image")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IconDecodeError);
    }
}
