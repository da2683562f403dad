//! Components and file records of the package under construction.

use super::capability::Capability;
use super::set::CapabilitySet;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Split a canonical `package:component` name into its two halves.
///
/// Returns `None` for names without a component part.
pub fn split_component(name: &str) -> Option<(&str, &str)> {
    name.split_once(':')
        .filter(|(pkg, comp)| !pkg.is_empty() && !comp.is_empty())
}

/// A named unit of an installable package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageComponent {
    /// Canonical `package:component` name.
    pub name: String,

    /// Capabilities this component supplies.
    pub provides: CapabilitySet,

    /// Capabilities this component needs.
    pub requires: CapabilitySet,

    /// Filesystem paths owned by the component.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<PathBuf>,
}

impl PackageComponent {
    /// Create an empty component.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a provided capability.
    pub fn providing(mut self, capability: Capability) -> Self {
        self.provides.insert(capability);
        self
    }

    /// Add a required capability.
    pub fn requiring(mut self, capability: Capability) -> Self {
        self.requires.insert(capability);
        self
    }

    /// Add an owned path.
    pub fn owning(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.push(path.into());
        self
    }
}

/// A path inside the package being built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path as installed, e.g. `/usr/bin/foo`.
    pub path: PathBuf,

    /// Capabilities this file requires.
    #[serde(default)]
    pub requires: CapabilitySet,

    /// Whether the file has real content, as opposed to a metadata-only
    /// entry such as a directory or a ghost file.
    #[serde(default = "default_has_contents")]
    pub has_contents: bool,

    /// Interpreter named by the file's `#!` line, when it is a script.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpreter: Option<PathBuf>,
}

fn default_has_contents() -> bool {
    true
}

impl FileRecord {
    /// Create a file record with content and no requirements.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            requires: CapabilitySet::new(),
            has_contents: true,
            interpreter: None,
        }
    }

    /// Add a required capability.
    pub fn requiring(mut self, capability: Capability) -> Self {
        self.requires.insert(capability);
        self
    }

    /// Mark the file as a script run by `interpreter`.
    pub fn with_interpreter(mut self, interpreter: impl Into<PathBuf>) -> Self {
        self.interpreter = Some(interpreter.into());
        self
    }

    /// Mark the file as metadata-only.
    pub fn without_contents(mut self) -> Self {
        self.has_contents = false;
        self
    }

    /// Whether this file has content and requires `capability`.
    pub fn needs(&self, capability: &Capability) -> bool {
        self.has_contents && self.requires.contains(capability)
    }
}
