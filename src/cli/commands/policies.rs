//! Policies command implementation.
//!
//! `buildreqs policies` lists each enforcer with the severity it reports at.

use crate::cli::args::PoliciesArgs;
use crate::config::{load_policy_config, PolicyConfig};
use crate::error::Result;
use crate::policy::{PolicyRegistry, CONFIG_LOG_POLICY};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The policies command implementation.
pub struct PoliciesCommand {
    args: PoliciesArgs,
}

impl PoliciesCommand {
    /// Create a new policies command.
    pub fn new(args: PoliciesArgs) -> Self {
        Self { args }
    }
}

impl Command for PoliciesCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = match self.args.config {
            Some(ref path) => load_policy_config(path)?,
            None => PolicyConfig::default(),
        };
        let registry = PolicyRegistry::with_builtins();

        let mut output = String::new();
        for policy in registry.iter() {
            let class = policy.class();
            let severity = config.severity_for(class, policy.default_severity());
            let state = if config.class_settings(class).enabled {
                ""
            } else {
                " (disabled)"
            };
            output.push_str(&format!(
                "{:<12} {:<40} {}{}\n",
                class.tag(),
                policy.name(),
                severity,
                state
            ));
        }

        let state = if !config.config_log.enabled || config.ignore_deps {
            " (disabled)"
        } else {
            ""
        };
        output.push_str(&format!(
            "{:<12} {:<40} {}{}\n",
            "config.log",
            CONFIG_LOG_POLICY,
            config.config_log_severity(),
            state
        ));

        ui.output(&output);
        Ok(CommandResult::success())
    }
}
