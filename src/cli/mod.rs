//! Command-line interface for buildreqs.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{CheckArgs, Cli, Commands, ManifestArgs, PoliciesArgs};
pub use commands::{Command, CommandDispatcher, CommandResult};
