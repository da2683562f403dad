//! The package build under analysis.
//!
//! A [`BuildContext`] is everything the build-recipe side hands over:
//! the declared build requirements and what each one resolves to, the
//! components and files that were built, and where the build happened.

use crate::deps::{read_interpreter, FileRecord, PackageComponent};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// One package build.
///
/// ```yaml
/// name: foo
/// build_requires: [gcc, "foo-libs:devel"]
/// build_req_map:
///   gcc: { name: "gcc:runtime", requires: ["soname: libmpc.so.3"] }
///   "foo-libs:devel": { name: "foo-libs:devel" }
/// components:
///   - name: foo:runtime
///     requires: ["soname: libbar.so.2"]
/// files:
///   - path: /usr/bin/foo
///     requires: ["soname: libbar.so.2"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildContext {
    /// Package name.
    pub name: String,

    /// Build requirements exactly as the recipe declares them.
    pub build_requires: Vec<String>,

    /// What each declared requirement resolved to.
    pub build_req_map: BTreeMap<String, PackageComponent>,

    /// Components produced by the build.
    pub components: Vec<PackageComponent>,

    /// Files produced by the build.
    pub files: Vec<FileRecord>,

    /// Directory the package was configured and built in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_dir: Option<PathBuf>,

    /// Directory the package was installed into; file paths are relative
    /// to it. Used to read `#!` lines of files without a known
    /// interpreter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dest_dir: Option<PathBuf>,
}

impl BuildContext {
    /// Create an empty build of `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Declare a build requirement that resolves to `component`, declared
    /// under the component's own name.
    pub fn declare(mut self, component: PackageComponent) -> Self {
        self.build_requires.push(component.name.clone());
        self.build_req_map.insert(component.name.clone(), component);
        self
    }

    /// Add a built component.
    pub fn with_component(mut self, component: PackageComponent) -> Self {
        self.components.push(component);
        self
    }

    /// Add a built file.
    pub fn with_file(mut self, file: FileRecord) -> Self {
        self.files.push(file);
        self
    }

    /// Components the declared build requirements resolve to.
    ///
    /// Declared requirements the recipe could not resolve are skipped; branch and
    /// flavor are not part of the comparison.
    pub fn declared_components(&self) -> Vec<&PackageComponent> {
        self.build_requires
            .iter()
            .filter_map(|declared| {
                let resolved = self.build_req_map.get(declared);
                if resolved.is_none() {
                    tracing::warn!(requirement = %declared, "Build requirement did not resolve; ignoring");
                }
                resolved
            })
            .collect()
    }

    /// Canonical names of the declared build requirements.
    pub fn declared_names(&self) -> BTreeSet<String> {
        self.declared_components()
            .into_iter()
            .map(|component| component.name.clone())
            .collect()
    }

    /// Names of the components this build produces.
    pub fn component_names(&self) -> BTreeSet<String> {
        self.components.iter().map(|c| c.name.clone()).collect()
    }

    /// Fill in interpreters for content files by reading their `#!` line
    /// under [`dest_dir`](Self::dest_dir). Does nothing without one.
    pub fn detect_interpreters(&mut self) {
        let Some(dest_dir) = self.dest_dir.clone() else {
            return;
        };
        for file in self
            .files
            .iter_mut()
            .filter(|f| f.has_contents && f.interpreter.is_none())
        {
            let relative = file.path.strip_prefix("/").unwrap_or(&file.path);
            if let Some(interpreter) = read_interpreter(&dest_dir.join(relative)) {
                tracing::debug!(
                    path = %file.path.display(),
                    interpreter = %interpreter.display(),
                    "Detected script interpreter"
                );
                file.interpreter = Some(interpreter);
            }
        }
    }
}
