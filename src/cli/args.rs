//! Command line argument parsing and validation.

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// Wrap a zipped web site into an Android package
#[derive(Parser, Debug)]
#[command(
    name = "kodegen_bundler_webapk",
    version,
    about = "Wrap a zipped web site into an Android package",
    long_about = "Wrap a zipped static web site into an Android-package-shaped container.

Usage:
  kodegen_bundler_webapk build --name \"My App\" --version 1.0 --assets site.zip --icon icon.png
  kodegen_bundler_webapk handle --input event.json
  kodegen_bundler_webapk inspect My_App_v1.0.apk

The site must contain index.html at its root or inside exactly one
top-level folder. The produced package carries placeholder code and a
placeholder signature; compile and sign it before installing."
)]
pub struct Args {
    /// Build configuration table (TOML); built-in defaults when omitted
    #[arg(long, global = true, value_name = "FILE", env = "WEBAPK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Show extra detail
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress everything except errors and requested data
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a package from a site archive and an icon
    Build(BuildArgs),

    /// Answer one JSON request event
    Handle(HandleArgs),

    /// List the entries of a package
    Inspect(InspectArgs),
}

/// Arguments for `build`
#[derive(ClapArgs, Debug, Clone)]
pub struct BuildArgs {
    /// Application display name
    #[arg(long, value_name = "NAME")]
    pub name: String,

    /// Application version (e.g. 1.0.0)
    #[arg(long = "version", value_name = "VERSION")]
    pub app_version: String,

    /// Zipped site containing index.html
    #[arg(long, value_name = "ZIP")]
    pub assets: PathBuf,

    /// Icon image (PNG, JPEG, ...)
    #[arg(long, value_name = "IMAGE")]
    pub icon: PathBuf,

    /// Output file or directory; defaults to the artifact name in the current directory
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for `handle`
#[derive(ClapArgs, Debug, Clone)]
pub struct HandleArgs {
    /// File holding the request event; stdin when omitted
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,
}

/// Arguments for `inspect`
#[derive(ClapArgs, Debug, Clone)]
pub struct InspectArgs {
    /// Package to inspect
    #[arg(value_name = "APK")]
    pub package: PathBuf,

    /// Print the listing as JSON
    #[arg(long)]
    pub json: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if let Command::Build(build) = &self.command {
            if build.name.trim().is_empty() {
                return Err("--name must not be empty".to_string());
            }
            if build.app_version.trim().is_empty() {
                return Err("--version must not be empty".to_string());
            }
        }
        Ok(())
    }
}

impl Command {
    /// Command name for messages
    pub fn name(&self) -> &'static str {
        match self {
            Command::Build(_) => "build",
            Command::Handle(_) => "handle",
            Command::Inspect(_) => "inspect",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build() {
        let args = Args::try_parse_from([
            "kodegen_bundler_webapk",
            "build",
            "--name",
            "My App",
            "--version",
            "2.1",
            "--assets",
            "site.zip",
            "--icon",
            "icon.png",
        ])
        .unwrap();
        match args.command {
            Command::Build(build) => {
                assert_eq!(build.name, "My App");
                assert_eq!(build.app_version, "2.1");
                assert!(build.output.is_none());
            }
            other => panic!("unexpected command {}", other.name()),
        }
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let args = Args::try_parse_from([
            "kodegen_bundler_webapk",
            "build",
            "--name",
            " ",
            "--version",
            "1",
            "--assets",
            "a.zip",
            "--icon",
            "i.png",
        ])
        .unwrap();
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let args = Args::try_parse_from([
            "kodegen_bundler_webapk",
            "inspect",
            "out.apk",
            "--config",
            "webapk.toml",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("webapk.toml")));
        assert_eq!(args.command.name(), "inspect");
    }
}
