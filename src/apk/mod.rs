//! Web-to-APK container assembly.
//!
//! Takes a zipped web site, an icon and an application name/version and
//! produces a ZIP container laid out like an Android package: manifest,
//! resource table, density icons, a code placeholder, the site under
//! `assets/www/` and `META-INF` integrity entries.
//!
//! The pipeline is synchronous, in-memory and deterministic: identical
//! inputs give byte-identical output. It performs no I/O and never logs.
//!
//! # Components
//!
//! | Component | Module | Output |
//! |-----------|--------|--------|
//! | Metadata sanitizer | [`metadata`] | package id, version code, file name |
//! | Asset tree validator | [`assets::validator`] | entry point check |
//! | Viewport injector | [`assets::viewport`] | rewritten markup |
//! | Manifest encoder | [`manifest`] | `AndroidManifest.xml` |
//! | Resource table builder | [`resources`] | `resources.arsc`, `res/*/icon.png` |
//! | Code stub generator | [`dex`] | `classes.dex` |
//! | Signature block writer | [`signature`] | `META-INF/*` |
//! | Container assembler | [`builder`] | the container bytes |
//!
//! # Placeholder entries
//!
//! `classes.dex` and `META-INF/CERT.RSA` are structurally valid but carry no
//! executable code and no real signature. The container passes structural
//! inspection; it is not an installable, runnable application on its own.

#![warn(missing_docs)]

pub mod assets;
pub mod builder;
pub mod container;
pub mod dex;
mod error;
pub mod manifest;
pub mod metadata;
pub mod resources;
pub mod settings;
pub mod signature;

// Public re-exports
pub use assets::{AssetFile, AssetTree};
pub use builder::Assembler;
pub use container::{Container, ContainerEntry, StorageMode};
pub use error::{AssemblyCause, Error, ErrorKind, Result, StageContext};
pub use metadata::AppIdentity;
pub use settings::{
    AssetSettings, BuildConfig, CodeStubSettings, DensityBucket, DigestAlgorithm,
    IdentitySettings, ManifestSettings, ResourceSettings, SignatureSettings,
};
