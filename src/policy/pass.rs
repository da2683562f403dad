//! One complete enforcement pass over a package build.

use super::analyzer::DependencyGapAnalyzer;
use super::class::{PolicyRegistry, Severity};
use super::config_log::{discover_logs, ConfigLogReport, ConfigLogScanner};
use super::exceptions::ExceptionFilter;
use super::gap::CapabilityGap;
use super::hook::MissingRequirementsHook;
use super::report::GapReport;
use crate::config::{MacroTable, PolicyConfig};
use crate::context::BuildContext;
use crate::database::ComponentDatabase;
use crate::deps::DepClass;
use crate::error::Result;
use crate::output::Finding;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Everything one pass found.
#[derive(Debug, Clone, Default)]
pub struct PassOutcome {
    /// Reports of class enforcers that had something to look at.
    pub reports: Vec<GapReport>,
    pub config_log: Option<ConfigLogReport>,
}

impl PassOutcome {
    /// All findings, class enforcers first, then config.log.
    pub fn findings(&self) -> Vec<Finding> {
        let mut findings: Vec<Finding> = self.reports.iter().flat_map(|r| r.findings()).collect();
        if let Some(ref log) = self.config_log {
            findings.extend(log.findings());
        }
        findings
    }

    /// Every suggested addition, coalesced across enforcers.
    ///
    /// Choice groups are left out: nothing says which member to pick.
    pub fn missing(&self) -> BTreeSet<String> {
        let mut missing: BTreeSet<String> = self
            .reports
            .iter()
            .flat_map(|r| r.missing.iter().cloned())
            .collect();
        if let Some(ref log) = self.config_log {
            missing.extend(log.missing.iter().cloned());
        }
        missing
    }

    /// Whether any finding should fail the build.
    pub fn has_errors(&self) -> bool {
        self.findings().iter().any(|f| f.severity == Severity::Error)
    }
}

/// Runs every enabled enforcer against one build.
pub struct AnalysisPass<'a> {
    config: &'a PolicyConfig,
    registry: &'a PolicyRegistry,
    only: Option<BTreeSet<DepClass>>,
}

impl<'a> AnalysisPass<'a> {
    pub fn new(config: &'a PolicyConfig, registry: &'a PolicyRegistry) -> Self {
        Self {
            config,
            registry,
            only: None,
        }
    }

    /// Run only these class enforcers. The config.log enforcer is skipped.
    pub fn only(mut self, classes: impl IntoIterator<Item = DepClass>) -> Self {
        self.only = Some(classes.into_iter().collect());
        self
    }

    /// Run the pass.
    ///
    /// Every exception and greylist pattern is compiled before any
    /// analysis starts, so a bad configuration fails without partial
    /// output. The hook, when given, is called once with the coalesced
    /// suggestions if there are any.
    pub fn run(
        &self,
        ctx: &BuildContext,
        db: &dyn ComponentDatabase,
        hook: Option<&mut dyn MissingRequirementsHook>,
    ) -> Result<PassOutcome> {
        let mut macros = MacroTable::with_defaults().merged(&self.config.macros);
        if macros.get("name").is_none() && !ctx.name.is_empty() {
            macros.set("name", ctx.name.clone());
        }

        let declared_components = ctx.declared_components();
        let declared = ctx.declared_names();

        let mut analyzers = Vec::new();
        for policy in self.registry.iter() {
            let class = policy.class();
            if let Some(ref only) = self.only {
                if !only.contains(&class) {
                    continue;
                }
            }
            let settings = self.config.class_settings(class);
            if !settings.enabled {
                tracing::debug!(policy = policy.name(), "Disabled by configuration");
                continue;
            }
            let exceptions = ExceptionFilter::compile(&settings.exceptions, &macros)?;
            tracing::debug!(
                policy = policy.name(),
                literals = exceptions.literal_count(),
                patterns = exceptions.pattern_count(),
                "Compiled exceptions"
            );
            let severity = self.config.severity_for(class, policy.default_severity());
            analyzers.push(DependencyGapAnalyzer::new(
                policy,
                exceptions,
                declared.clone(),
                severity,
            ));
        }

        let scanner = if self.runs_config_log() {
            Some(ConfigLogScanner::new(
                &self.config.config_log,
                &macros,
                &ctx.component_names(),
                self.config.config_log_severity(),
            )?)
        } else {
            None
        };

        let gap = CapabilityGap::compute(&ctx.components);
        let mut outcome = PassOutcome::default();
        for analyzer in &analyzers {
            if let Some(report) = analyzer.analyze(db, &gap, &ctx.files)? {
                outcome.reports.push(report);
            }
        }

        if let Some(scanner) = scanner {
            let logs = self.config_logs(ctx)?;
            if !logs.is_empty() {
                outcome.config_log = Some(scanner.check(&logs, db, &declared_components)?);
            }
        }

        let missing = outcome.missing();
        tracing::info!(
            package = %ctx.name,
            gap = gap.all().len(),
            findings = outcome.findings().len(),
            missing = missing.len(),
            "Build requirement check complete"
        );

        if let Some(hook) = hook {
            if !missing.is_empty() {
                hook.report_missing(&missing);
            }
        }

        Ok(outcome)
    }

    fn runs_config_log(&self) -> bool {
        if self.only.is_some() || !self.config.config_log.enabled {
            return false;
        }
        if self.config.ignore_deps {
            tracing::debug!("ignore_deps set; skipping config.log enforcement");
            return false;
        }
        true
    }

    /// Configured logs, resolved against the build directory, followed by
    /// any discovered under it.
    fn config_logs(&self, ctx: &BuildContext) -> Result<Vec<PathBuf>> {
        let mut logs: Vec<PathBuf> = self
            .config
            .config_log
            .logs
            .iter()
            .map(|log| match ctx.build_dir {
                Some(ref dir) if log.is_relative() => dir.join(log),
                _ => log.clone(),
            })
            .collect();

        if let Some(ref dir) = ctx.build_dir {
            if dir.is_dir() {
                for log in discover_logs(dir)? {
                    if !logs.contains(&log) {
                        logs.push(log);
                    }
                }
            }
        }
        Ok(logs)
    }
}
