//! Check command implementation.
//!
//! `buildreqs check` runs every enforcer against one package build and
//! prints what the declared build requirements are missing.

use std::collections::BTreeSet;

use crate::cli::args::CheckArgs;
use crate::config::{load_document, load_policy_config, PolicyConfig};
use crate::context::BuildContext;
use crate::database::MemoryDatabase;
use crate::error::Result;
use crate::output::{HumanFormatter, JsonFormatter, OutputFormat, ReportFormatter};
use crate::policy::{AnalysisPass, CollectingHook, MissingRequirementsHook, PolicyRegistry};
use crate::ui::{should_use_colors, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// The check command implementation.
pub struct CheckCommand {
    args: CheckArgs,
}

impl CheckCommand {
    /// Create a new check command.
    pub fn new(args: CheckArgs) -> Self {
        Self { args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &CheckArgs {
        &self.args
    }

    fn load_context(&self) -> Result<BuildContext> {
        let mut ctx: BuildContext = load_document(&self.args.package)?;
        if let Some(ref dir) = self.args.build_dir {
            ctx.build_dir = Some(dir.clone());
        }
        if let Some(ref dir) = self.args.dest_dir {
            ctx.dest_dir = Some(dir.clone());
        }
        ctx.detect_interpreters();
        Ok(ctx)
    }

    fn format_output(
        &self,
        findings: &[crate::output::Finding],
        missing: &BTreeSet<String>,
    ) -> Result<String> {
        let mut output = Vec::new();
        match self.args.format {
            OutputFormat::Json => JsonFormatter::new().format(findings, missing, &mut output)?,
            OutputFormat::Human => {
                HumanFormatter::new(should_use_colors()).format(findings, missing, &mut output)?
            }
        }
        Ok(String::from_utf8_lossy(&output).into_owned())
    }
}

impl Command for CheckCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = match self.args.config {
            Some(ref path) => load_policy_config(path)?,
            None => PolicyConfig::default(),
        };
        let ctx = self.load_context()?;
        let registry = PolicyRegistry::with_builtins();

        let mut pass = AnalysisPass::new(&config, &registry);
        if !self.args.class.is_empty() {
            pass = pass.only(self.args.class.iter().copied());
        }

        let mut hook = CollectingHook::default();
        let outcome = {
            let db = MemoryDatabase::load(&self.args.database)?;
            let hook: Option<&mut dyn MissingRequirementsHook> = if self.args.write_missing.is_some()
            {
                Some(&mut hook)
            } else {
                None
            };
            pass.run(&ctx, &db, hook)?
        };

        if let Some(ref path) = self.args.write_missing {
            let names: BTreeSet<&String> = hook.reported.iter().flatten().collect();
            let mut contents = String::new();
            for name in names {
                contents.push_str(name);
                contents.push('\n');
            }
            std::fs::write(path, contents)?;
        }

        let findings = outcome.findings();
        let missing = outcome.missing();

        if findings.is_empty() && self.args.format == OutputFormat::Human {
            ui.success(&format!("{}: no missing build requirements", ctx.name));
        } else {
            let output = self.format_output(&findings, &missing)?;
            ui.output(&output);
        }

        if outcome.has_errors() {
            Ok(CommandResult::failure(1))
        } else {
            Ok(CommandResult::success())
        }
    }
}
