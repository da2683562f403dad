//! Build requirement enforcement.
//!
//! A pass computes what the built package needs but does not provide
//! itself ([`CapabilityGap`]), then hands each dependency class to its
//! enforcer ([`DependencyClassPolicy`]). Every enforcer runs the same
//! [`DependencyGapAnalyzer`]: look up providers, prefer the right
//! component of each, drop exceptions, and report whatever the declared
//! build requirements do not already cover. Separately,
//! [`ConfigLogScanner`] looks for programs configure found.
//!
//! # Example
//!
//! ```
//! use buildreqs::config::PolicyConfig;
//! use buildreqs::context::BuildContext;
//! use buildreqs::database::MemoryDatabase;
//! use buildreqs::deps::{Capability, PackageComponent};
//! use buildreqs::policy::{AnalysisPass, PolicyRegistry};
//!
//! let libfoo: Capability = "soname: libfoo.so.1".parse().unwrap();
//! let ctx = BuildContext::new("app")
//!     .with_component(PackageComponent::new("app:runtime").requiring(libfoo.clone()));
//! let db = MemoryDatabase::from_components(vec![
//!     PackageComponent::new("foo:lib").providing(libfoo),
//!     PackageComponent::new("foo:devel"),
//! ]);
//!
//! let config = PolicyConfig::default();
//! let registry = PolicyRegistry::with_builtins();
//! let outcome = AnalysisPass::new(&config, &registry).run(&ctx, &db, None).unwrap();
//! assert!(outcome.missing().contains("foo:devel"));
//! ```

pub mod analyzer;
pub mod class;
pub mod config_log;
pub mod exceptions;
pub mod gap;
pub mod greylist;
pub mod hook;
pub mod pass;
pub mod report;

pub use analyzer::DependencyGapAnalyzer;
pub use class::{
    CilPolicy, DependencyClassPolicy, InterpreterPolicy, JavaPolicy, PerlPolicy, PolicyRegistry,
    PythonPolicy, Severity, SonamePolicy,
};
pub use config_log::{
    discover_logs, found_path, ConfigLogReport, ConfigLogScanner, LogLines, PathSuggestion,
    CONFIG_LOG_POLICY,
};
pub use exceptions::ExceptionFilter;
pub use gap::CapabilityGap;
pub use greylist::{default_entries, Greylist};
pub use hook::{CollectingHook, MissingRequirementsHook};
pub use pass::{AnalysisPass, PassOutcome};
pub use report::{CapabilityFiles, GapReport, InterpreterFinding};
