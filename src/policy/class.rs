//! Dependency-class enforcer definitions.
//!
//! This module provides the per-class half of build requirement
//! enforcement:
//!
//! - [`DependencyClassPolicy`] - The trait every class enforcer implements
//! - [`Severity`] - How loudly an enforcer reports (Warning, Error)
//! - [`PolicyRegistry`] - The set of enforcers a pass runs
//!
//! The shared algorithm lives in [`DependencyGapAnalyzer`](super::DependencyGapAnalyzer);
//! an enforcer only decides which component names to prefer for a
//! provider and how severe its findings are by default.

use crate::deps::DepClass;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Severity level for findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Reported, build continues.
    Warning,
    /// Reported, build should fail.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Per-class candidate resolution and severity.
pub trait DependencyClassPolicy: Send + Sync {
    /// The dependency class this enforcer covers.
    fn class(&self) -> DepClass;

    /// Human-readable enforcer name.
    fn name(&self) -> &str;

    /// Default severity for this enforcer.
    fn default_severity(&self) -> Severity;

    /// Candidate build requirements for a component providing a needed
    /// capability, most preferred first.
    fn candidate_names(&self, provider: &str) -> Vec<String> {
        vec![provider.to_string()]
    }
}

/// Shared libraries.
///
/// Prefers the `:devel` component (headers), then `:devellib` (the
/// unversioned `.so` link), and only then the `:lib` component itself.
pub struct SonamePolicy;

impl DependencyClassPolicy for SonamePolicy {
    fn class(&self) -> DepClass {
        DepClass::Soname
    }

    fn name(&self) -> &str {
        "EnforceSonameBuildRequirements"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn candidate_names(&self, provider: &str) -> Vec<String> {
        match provider.strip_suffix(":lib") {
            Some(package) => vec![
                format!("{}:devel", package),
                format!("{}:devellib", package),
                provider.to_string(),
            ],
            None => vec![provider.to_string()],
        }
    }
}

/// Scripts naming their interpreter.
pub struct InterpreterPolicy;

impl DependencyClassPolicy for InterpreterPolicy {
    fn class(&self) -> DepClass {
        DepClass::Interpreter
    }

    fn name(&self) -> &str {
        "EnforceInterpreterBuildRequirements"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }
}

pub struct PythonPolicy;

impl DependencyClassPolicy for PythonPolicy {
    fn class(&self) -> DepClass {
        DepClass::Python
    }

    fn name(&self) -> &str {
        "EnforcePythonBuildRequirements"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }
}

pub struct JavaPolicy;

impl DependencyClassPolicy for JavaPolicy {
    fn class(&self) -> DepClass {
        DepClass::Java
    }

    fn name(&self) -> &str {
        "EnforceJavaBuildRequirements"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }
}

pub struct CilPolicy;

impl DependencyClassPolicy for CilPolicy {
    fn class(&self) -> DepClass {
        DepClass::Cil
    }

    fn name(&self) -> &str {
        "EnforceCILBuildRequirements"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }
}

pub struct PerlPolicy;

impl DependencyClassPolicy for PerlPolicy {
    fn class(&self) -> DepClass {
        DepClass::Perl
    }

    fn name(&self) -> &str {
        "EnforcePerlBuildRequirements"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }
}

/// Registry of class enforcers, at most one per class.
pub struct PolicyRegistry {
    policies: BTreeMap<DepClass, Box<dyn DependencyClassPolicy>>,
}

impl PolicyRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            policies: BTreeMap::new(),
        }
    }

    /// Create a registry with an enforcer for every class.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(SonamePolicy));
        registry.register(Box::new(InterpreterPolicy));
        registry.register(Box::new(PythonPolicy));
        registry.register(Box::new(JavaPolicy));
        registry.register(Box::new(CilPolicy));
        registry.register(Box::new(PerlPolicy));
        registry
    }

    /// Register an enforcer, replacing any for the same class.
    pub fn register(&mut self, policy: Box<dyn DependencyClassPolicy>) {
        self.policies.insert(policy.class(), policy);
    }

    /// Get the enforcer for a class.
    pub fn get(&self, class: DepClass) -> Option<&dyn DependencyClassPolicy> {
        self.policies.get(&class).map(|p| p.as_ref())
    }

    /// Iterate over all enforcers in class order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn DependencyClassPolicy> {
        self.policies.values().map(|p| p.as_ref())
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

impl Default for PolicyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
