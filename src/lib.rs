//! # Kodegen WebAPK Bundler
//!
//! Wraps a zipped static web site into an Android-package-shaped container.
//!
//! The site's markup gets a mobile viewport, its files land under
//! `assets/www/`, and the container carries a manifest, a resource table,
//! density icons rendered from one source image, a placeholder code entry
//! and `META-INF` integrity entries.
//!
//! ## Features
//!
//! - **Deterministic**: identical inputs produce byte-identical containers
//! - **Fail-fast**: every input check runs before any output is produced
//! - **Configurable**: SDK levels, permissions, icon buckets, digest algorithm
//!   and asset limits come from a TOML table
//! - **Request handler**: a JSON envelope front end with CORS and status mapping
//!
//! ## Usage
//!
//! ```bash
//! kodegen_bundler_webapk build --name "My App" --version 1.0 --assets site.zip --icon icon.png
//! kodegen_bundler_webapk handle --input event.json
//! kodegen_bundler_webapk inspect My_App_v1.0.apk
//! ```
//!
//! The produced package is not signed with a real key and carries no
//! compiled code; it must go through a real Android toolchain before it
//! can be installed.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod apk;
pub mod cli;
pub mod error;
pub mod handler;

// Re-export main types for public API
pub use apk::{AppIdentity, Assembler, BuildConfig};
pub use cli::Args;
pub use error::{AppError, CliError, Result};
pub use handler::{RequestEvent, ResponseEvent};
