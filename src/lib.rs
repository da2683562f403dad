//! buildreqs - Build requirement enforcement for package builds.
//!
//! After a package is built, every file has a list of capabilities it
//! needs at run time: shared libraries, script interpreters, Python, Java,
//! CIL and Perl modules. Whatever the package does not provide itself has
//! to come from some other installed component, and that component (or a
//! better-suited sibling such as its `:devel` component) belongs in the
//! build requirements. buildreqs reports the ones the recipe forgot, and
//! also scans `config.log` for programs configure found and used.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Policy configuration and recipe macros
//! - [`context`] - The package build under analysis
//! - [`database`] - Installed-component database queries
//! - [`deps`] - Capabilities, capability sets, components and files
//! - [`error`] - Error types and result aliases
//! - [`manifest`] - RPM-style `%attr` manifest parsing
//! - [`output`] - Findings and their formatters
//! - [`policy`] - The enforcers and the analysis pass
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use buildreqs::deps::{Capability, DepClass};
//!
//! let cap: Capability = "soname: libc.so.6(ELF64 x86_64)".parse().unwrap();
//! assert_eq!(cap.class(), DepClass::Soname);
//! assert_eq!(cap.name(), "libc.so.6");
//! assert_eq!(cap.to_string(), "soname: libc.so.6(ELF64 x86_64)");
//! ```
//!
//! For complete passes, see [`policy`] and the integration tests.

pub mod cli;
pub mod config;
pub mod context;
pub mod database;
pub mod deps;
pub mod error;
pub mod manifest;
pub mod output;
pub mod policy;
pub mod ui;

pub use error::{BuildReqsError, Result};
