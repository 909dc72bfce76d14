//! Error types for container assembly.
//!
//! Every failure the pipeline can produce is one variant of [`Error`]. Input
//! problems (a corrupt archive, a missing entry point, an undecodable icon)
//! are detected before a single output byte is produced. Anything that goes
//! wrong while encoding or writing entries is wrapped in [`Error::Assembly`]
//! together with the stage that failed.
//!
//! # Example
//!
//! ```no_run
//! use kodegen_bundler_webapk::apk::{Assembler, AppIdentity, BuildConfig, ErrorKind};
//!
//! # fn example(site: &[u8], icon: &[u8]) {
//! let config = BuildConfig::default();
//! let identity = AppIdentity::new("My App", "1.0", &config.identity).unwrap();
//! match Assembler::new(config).assemble(&identity, site, icon) {
//!     Ok(bytes) => println!("{} bytes", bytes.len()),
//!     Err(e) if e.kind() == ErrorKind::MissingEntryPoint => eprintln!("no index.html"),
//!     Err(e) => eprintln!("{e}"),
//! }
//! # }
//! ```

use std::{fmt, io};
use thiserror::Error as DeriveError;

/// Errors returned by the container pipeline.
#[derive(Debug, DeriveError)]
#[non_exhaustive]
pub enum Error {
    /// The uploaded asset archive could not be parsed as a ZIP tree.
    #[error("asset archive is corrupt: {reason}")]
    CorruptArchive {
        /// Parser message
        reason: String,
    },

    /// No `index.html` at the archive root or one wrapper directory down.
    #[error("asset archive must contain index.html at its root")]
    MissingEntryPoint,

    /// An archive entry path is absolute, escapes the tree or is duplicated.
    #[error("invalid asset path {path:?}: {reason}")]
    InvalidAssetPath {
        /// Offending entry name as stored in the archive
        path: String,
        /// What is wrong with it
        reason: &'static str,
    },

    /// The archive exceeds one of the configured extraction limits.
    #[error("asset archive exceeds the {what} limit of {limit}")]
    AssetLimitExceeded {
        /// Which limit was hit ("entry count", "uncompressed size")
        what: &'static str,
        /// Configured limit
        limit: u64,
    },

    /// The icon bytes are not a decodable raster image.
    #[error("icon is not a decodable image: {0}")]
    IconDecode(#[source] image::ImageError),

    /// Application name or version is unusable.
    #[error("invalid {field}: {reason}")]
    InvalidMetadata {
        /// Field name ("name", "version")
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// A component failed while producing or writing an entry.
    #[error("assembly failed while {stage}: {cause}")]
    Assembly {
        /// Present-tense description of the failing step
        stage: &'static str,
        /// Underlying failure
        #[source]
        cause: AssemblyCause,
    },
}

/// Root causes wrapped by [`Error::Assembly`].
#[derive(Debug, DeriveError)]
#[non_exhaustive]
pub enum AssemblyCause {
    /// ZIP writer failure.
    #[error("{0}")]
    Zip(#[from] zip::result::ZipError),

    /// I/O failure on an in-memory buffer.
    #[error("{0}")]
    Io(#[from] io::Error),

    /// Re-encoding a resized icon failed.
    #[error("{0}")]
    IconEncode(#[from] image::ImageError),

    /// Descriptor serialization failed.
    #[error("descriptor encoding: {0}")]
    Encoding(String),

    /// Two entries were given the same container path.
    #[error("duplicate entry path {0:?}")]
    DuplicateEntry(String),
}

/// Coarse classification of an [`Error`], stable across variants.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// Input is not a valid compressed tree.
    CorruptArchive,
    /// No root-level entry point found.
    MissingEntryPoint,
    /// Icon bytes are not a decodable image.
    IconDecodeError,
    /// Name, version or asset paths were rejected.
    InvalidInput,
    /// A downstream component failed.
    AssemblyError,
}

impl ErrorKind {
    /// Whether the failure was caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ErrorKind::AssemblyError)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::CorruptArchive => "CorruptArchive",
            ErrorKind::MissingEntryPoint => "MissingEntryPoint",
            ErrorKind::IconDecodeError => "IconDecodeError",
            ErrorKind::InvalidInput => "InvalidInput",
            ErrorKind::AssemblyError => "AssemblyError",
        };
        f.write_str(name)
    }
}

impl Error {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::CorruptArchive { .. } | Error::AssetLimitExceeded { .. } => {
                ErrorKind::CorruptArchive
            }
            Error::MissingEntryPoint => ErrorKind::MissingEntryPoint,
            Error::IconDecode(_) => ErrorKind::IconDecodeError,
            Error::InvalidAssetPath { .. } | Error::InvalidMetadata { .. } => {
                ErrorKind::InvalidInput
            }
            Error::Assembly { .. } => ErrorKind::AssemblyError,
        }
    }

    pub(crate) fn corrupt(reason: impl fmt::Display) -> Self {
        Error::CorruptArchive {
            reason: reason.to_string(),
        }
    }
}

/// Convenient type alias for Result.
pub type Result<T> = std::result::Result<T, Error>;

/// Wraps low-level failures into [`Error::Assembly`] with the failing stage.
///
/// The `stage` should be a present-tense verb phrase, e.g. "writing manifest".
pub trait StageContext<T> {
    /// Attach the stage to the error.
    fn stage(self, stage: &'static str) -> Result<T>;
}

impl<T, E> StageContext<T> for std::result::Result<T, E>
where
    E: Into<AssemblyCause>,
{
    fn stage(self, stage: &'static str) -> Result<T> {
        self.map_err(|e| Error::Assembly {
            stage,
            cause: e.into(),
        })
    }
}
