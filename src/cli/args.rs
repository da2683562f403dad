//! CLI argument definitions.
//!
//! The main entry point is the [`Cli`] struct.

use crate::deps::DepClass;
use crate::output::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// buildreqs - Find build requirements a package build forgot to declare.
#[derive(Debug, Parser)]
#[command(name = "buildreqs")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check a package build for undeclared build requirements
    Check(CheckArgs),

    /// List the enforcers and their severities
    Policies(PoliciesArgs),

    /// Parse an RPM-style %attr manifest
    Manifest(ManifestArgs),
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CheckArgs {
    /// Package build description (YAML or JSON)
    #[arg(short, long)]
    pub package: PathBuf,

    /// Installed component database snapshot (YAML or JSON)
    #[arg(short, long)]
    pub database: PathBuf,

    /// Policy configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Build directory to search for config.log files
    #[arg(long)]
    pub build_dir: Option<PathBuf>,

    /// Install root used to read script interpreters
    #[arg(long)]
    pub dest_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    /// Only run enforcers for these classes (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub class: Vec<DepClass>,

    /// Write suggested build requirements to this file, one per line
    #[arg(long, value_name = "FILE")]
    pub write_missing: Option<PathBuf>,
}

/// Arguments for the `policies` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct PoliciesArgs {
    /// Show severities as configured by this policy file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the `manifest` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ManifestArgs {
    /// Manifest file to parse
    pub file: PathBuf,
}
