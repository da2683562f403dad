//! The shared gap-analysis algorithm every class enforcer runs.

use super::class::{DependencyClassPolicy, Severity};
use super::exceptions::ExceptionFilter;
use super::gap::CapabilityGap;
use super::report::{GapReport, InterpreterFinding};
use crate::database::ComponentDatabase;
use crate::deps::{Capability, FileRecord};
use crate::error::Result;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Runs one class enforcer against a package's capability gap.
pub struct DependencyGapAnalyzer<'a> {
    policy: &'a dyn DependencyClassPolicy,
    exceptions: ExceptionFilter,
    declared: BTreeSet<String>,
    severity: Severity,
}

impl<'a> DependencyGapAnalyzer<'a> {
    /// Create an analyzer.
    ///
    /// `declared` holds the canonical names of the declared build
    /// requirements.
    pub fn new(
        policy: &'a dyn DependencyClassPolicy,
        exceptions: ExceptionFilter,
        declared: BTreeSet<String>,
        severity: Severity,
    ) -> Self {
        Self {
            policy,
            exceptions,
            declared,
            severity,
        }
    }

    /// Analyze the gap for this enforcer's class.
    ///
    /// Returns `None` when the package needs nothing of this class. A
    /// returned report may still be empty when every need is already
    /// declared or excepted.
    pub fn analyze(
        &self,
        db: &dyn ComponentDatabase,
        gap: &CapabilityGap,
        files: &[FileRecord],
    ) -> Result<Option<GapReport>> {
        let needed = gap.for_class(self.policy.class());
        if needed.is_empty() {
            tracing::debug!(policy = self.policy.name(), "Nothing required; skipping");
            return Ok(None);
        }

        let capabilities: Vec<Capability> = needed.iter().cloned().collect();
        let providers = db.providers_for(&capabilities)?;

        let mut report = GapReport::new(self.policy.class(), self.policy.name(), self.severity);
        let mut interpreters: BTreeSet<PathBuf> = BTreeSet::new();

        for capability in &capabilities {
            let needing: Vec<&FileRecord> = files.iter().filter(|f| f.needs(capability)).collect();
            interpreters.extend(needing.iter().filter_map(|f| f.interpreter.clone()));

            let Some(provider_names) = providers.get(capability) else {
                report.unresolved.insert(capability.clone());
                report.correlate(capability, &BTreeSet::new(), &needing);
                continue;
            };

            let mut candidates = self.resolve_candidates(db, provider_names)?;
            self.exceptions.filter(&mut candidates);
            if candidates.is_empty() {
                tracing::debug!(capability = %capability, "Every candidate is excepted");
                continue;
            }
            if self.declares_any(provider_names, &candidates) {
                tracing::debug!(capability = %capability, "Already declared");
                continue;
            }

            if candidates.len() == 1 {
                report.missing.extend(candidates.iter().cloned());
            } else {
                report.add_choice(candidates.clone());
            }
            report.correlate(capability, &candidates, &needing);
        }

        for interpreter in interpreters {
            for owner in db.owners_of_path(&interpreter)? {
                if self.exceptions.matches(&owner) || self.declared.contains(&owner) {
                    continue;
                }
                report.missing.insert(owner.clone());
                report.interpreters.push(InterpreterFinding {
                    interpreter: interpreter.clone(),
                    component: owner,
                });
            }
        }

        tracing::debug!(
            policy = self.policy.name(),
            missing = report.missing.len(),
            choices = report.choices.len(),
            unresolved = report.unresolved.len(),
            "Finished class analysis"
        );

        Ok(Some(report))
    }

    /// Whether a declared name is one of the providers, one of their
    /// cascade variants, or a resolved candidate.
    fn declares_any(&self, providers: &BTreeSet<String>, candidates: &BTreeSet<String>) -> bool {
        candidates.iter().any(|name| self.declared.contains(name))
            || providers.iter().any(|provider| {
                self.declared.contains(provider)
                    || self
                        .policy
                        .candidate_names(provider)
                        .iter()
                        .any(|variant| self.declared.contains(variant))
            })
    }

    /// Map each provider to its most preferred installed candidate.
    fn resolve_candidates(
        &self,
        db: &dyn ComponentDatabase,
        providers: &BTreeSet<String>,
    ) -> Result<BTreeSet<String>> {
        let mut candidates = BTreeSet::new();
        for provider in providers {
            for candidate in self.policy.candidate_names(provider) {
                if db.has_component(&candidate)? {
                    candidates.insert(candidate);
                    break;
                }
            }
        }
        Ok(candidates)
    }
}
