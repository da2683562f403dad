//! Results of one dependency-class enforcer.

use super::class::Severity;
use crate::deps::{Capability, DepClass, FileRecord};
use crate::output::Finding;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Files that need one capability, and what would satisfy it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilityFiles {
    pub capability: Capability,
    /// Suggested components; empty when nothing installed provides it.
    pub candidates: BTreeSet<String>,
    pub paths: Vec<PathBuf>,
}

/// A script whose interpreter's owner is not a build requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterpreterFinding {
    pub interpreter: PathBuf,
    pub component: String,
}

/// What one class enforcer found in one pass.
#[derive(Debug, Clone, Serialize)]
pub struct GapReport {
    pub class: DepClass,
    pub policy: String,
    pub severity: Severity,

    /// Components that should be added to the build requirements.
    pub missing: BTreeSet<String>,

    /// Groups of equivalent candidates; any one member would do.
    pub choices: Vec<BTreeSet<String>>,

    pub interpreters: Vec<InterpreterFinding>,

    pub capability_files: Vec<CapabilityFiles>,

    /// Unsatisfied capabilities per file.
    pub file_gaps: BTreeMap<PathBuf, BTreeSet<Capability>>,

    /// Capabilities nothing on the system provides.
    pub unresolved: BTreeSet<Capability>,
}

impl GapReport {
    /// Create an empty report.
    pub fn new(class: DepClass, policy: impl Into<String>, severity: Severity) -> Self {
        Self {
            class,
            policy: policy.into(),
            severity,
            missing: BTreeSet::new(),
            choices: Vec::new(),
            interpreters: Vec::new(),
            capability_files: Vec::new(),
            file_gaps: BTreeMap::new(),
            unresolved: BTreeSet::new(),
        }
    }

    /// Record a choice group unless an equal group is already present.
    ///
    /// Returns `false` for duplicates.
    pub fn add_choice(&mut self, candidates: BTreeSet<String>) -> bool {
        if self.choices.contains(&candidates) {
            return false;
        }
        self.choices.push(candidates);
        true
    }

    /// Record which content files need `capability`.
    pub fn correlate(
        &mut self,
        capability: &Capability,
        candidates: &BTreeSet<String>,
        files: &[&FileRecord],
    ) {
        if files.is_empty() {
            return;
        }
        let mut paths: Vec<PathBuf> = files.iter().map(|f| f.path.clone()).collect();
        paths.sort();
        for path in &paths {
            self.file_gaps
                .entry(path.clone())
                .or_default()
                .insert(capability.clone());
        }
        self.capability_files.push(CapabilityFiles {
            capability: capability.clone(),
            candidates: candidates.clone(),
            paths,
        });
    }

    /// Whether the enforcer found nothing to say.
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty()
            && self.choices.is_empty()
            && self.capability_files.is_empty()
            && self.unresolved.is_empty()
    }

    /// Render the report as findings.
    ///
    /// Order: definite missing (with interpreter detail), choice groups,
    /// file correlations, unresolved capabilities.
    pub fn findings(&self) -> Vec<Finding> {
        let mut findings = Vec::new();

        if !self.missing.is_empty() {
            findings.push(self.finding(
                self.severity,
                format!("add to buildRequires: {}", join(&self.missing)),
            ));
        }
        for found in &self.interpreters {
            findings.push(
                self.finding(
                    self.severity,
                    format!(
                        "interpreter {} missing build requirement {}",
                        found.interpreter.display(),
                        found.component
                    ),
                )
                .with_path(found.interpreter.clone()),
            );
        }

        for choice in &self.choices {
            findings.push(self.finding(
                self.severity,
                format!("add to buildRequires one of: {}", join(choice)),
            ));
        }

        for entry in &self.capability_files {
            let paths: Vec<String> = entry.paths.iter().map(|p| p.display().to_string()).collect();
            let message = if entry.candidates.is_empty() {
                format!(
                    "nothing installed provides \"{}\" needed by files: {}",
                    entry.capability,
                    paths.join(", ")
                )
            } else {
                format!(
                    "buildRequires {} needed to satisfy \"{}\" for files: {}",
                    join(&entry.candidates),
                    entry.capability,
                    paths.join(", ")
                )
            };
            findings.push(self.finding(Severity::Warning, message));
        }
        for (path, caps) in &self.file_gaps {
            let caps: Vec<String> = caps.iter().map(|c| c.to_string()).collect();
            findings.push(
                self.finding(
                    Severity::Warning,
                    format!(
                        "file {} has unsatisfied build requirements \"{}\"",
                        path.display(),
                        caps.join("\", \"")
                    ),
                )
                .with_path(path.clone()),
            );
        }

        if !self.unresolved.is_empty() {
            let caps: Vec<String> = self.unresolved.iter().map(|c| c.to_string()).collect();
            findings.push(self.finding(
                self.severity,
                format!(
                    "The following dependencies are not resolved within the package \
                     or in the system database: {}",
                    caps.join(", ")
                ),
            ));
        }

        findings
    }

    fn finding(&self, severity: Severity, message: String) -> Finding {
        Finding::new(self.policy.clone(), severity, message)
    }
}

fn join(names: &BTreeSet<String>) -> String {
    names.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}
