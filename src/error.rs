//! Application-level error types for the CLI and request handler.
//!
//! Wraps core pipeline errors together with the I/O and parsing failures
//! that only occur at the edges, and offers recovery suggestions for the
//! terminal.

use crate::apk::{self, ErrorKind};
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for application operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Main error type for everything outside the core pipeline
#[derive(Error, Debug)]
pub enum AppError {
    /// Container pipeline errors
    #[error("Build error: {0}")]
    Build(#[from] apk::Error),

    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// File system error with path context
    #[error("{context} {path}: {error}")]
    Fs {
        /// Operation that failed
        context: &'static str,
        /// Path being accessed
        path: PathBuf,
        /// Underlying error
        error: std::io::Error,
    },

    /// Configuration file could not be loaded
    #[error("Invalid configuration {path}: {reason}")]
    Config {
        /// Configuration file path
        path: PathBuf,
        /// Parser or I/O message
        reason: String,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// ZIP inspection errors
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Blocking build task panicked or was cancelled
    #[error("Build task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

impl AppError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            AppError::Build(e) => match e.kind() {
                ErrorKind::CorruptArchive => vec![
                    "Re-create the site archive with a standard ZIP tool".to_string(),
                    "Check the archive against the configured size and entry limits".to_string(),
                ],
                ErrorKind::MissingEntryPoint => vec![
                    "Place index.html at the root of the archive".to_string(),
                    "Or wrap the whole site in exactly one top-level folder".to_string(),
                ],
                ErrorKind::IconDecodeError => vec![
                    "Provide the icon as PNG or JPEG".to_string(),
                    "Use a square image of at least 192x192 pixels".to_string(),
                ],
                ErrorKind::InvalidInput => vec![
                    "Provide a non-empty application name and version".to_string(),
                    "Remove absolute or '..' paths from the archive".to_string(),
                ],
                ErrorKind::AssemblyError => {
                    vec!["Re-run with RUST_LOG=debug and report the failing stage".to_string()]
                }
            },
            AppError::Config { path, .. } => vec![
                format!("Check the TOML syntax of {}", path.display()),
                "Remove keys that are not part of the build configuration".to_string(),
            ],
            AppError::Fs { path, .. } => vec![format!(
                "Verify that {} exists and is readable/writable",
                path.display()
            )],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}

/// Extension trait adding path context to I/O results
pub trait ErrorExt<T> {
    /// Wrap an I/O error with a present-tense operation and the path involved
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|error| AppError::Fs {
            context,
            path: path.into(),
            error,
        })
    }
}
