//! Command line interface for kodegen_bundler_webapk.

mod args;
pub mod commands;
mod output;

pub use args::{Args, BuildArgs, Command, HandleArgs, InspectArgs};
pub use commands::execute_command;
pub use output::OutputManager;

use crate::apk::{Assembler, BuildConfig};
use crate::error::Result;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    execute_command(args).await
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    output: OutputManager,
    assembler: Assembler,
}

impl RuntimeConfig {
    /// Load the build configuration named by `--config`, or the defaults.
    pub fn from_args(args: &Args) -> Result<Self> {
        let build_config = match &args.config {
            Some(path) => {
                log::debug!("Loading build configuration from {}", path.display());
                BuildConfig::load(path)?
            }
            None => BuildConfig::default(),
        };

        Ok(Self {
            output: OutputManager::new(args.verbose, args.quiet),
            assembler: Assembler::new(build_config),
        })
    }

    /// Terminal output
    pub fn output(&self) -> &OutputManager {
        &self.output
    }

    /// Assembler built from the loaded configuration
    pub fn assembler(&self) -> &Assembler {
        &self.assembler
    }
}
