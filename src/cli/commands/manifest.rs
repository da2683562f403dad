//! Manifest command implementation.
//!
//! `buildreqs manifest` prints the packaging actions an RPM-style
//! manifest implies, as JSON.

use crate::cli::args::ManifestArgs;
use crate::error::Result;
use crate::manifest::load_manifest;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The manifest command implementation.
pub struct ManifestCommand {
    args: ManifestArgs,
}

impl ManifestCommand {
    /// Create a new manifest command.
    pub fn new(args: ManifestArgs) -> Self {
        Self { args }
    }
}

impl Command for ManifestCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let actions = load_manifest(&self.args.file)?;
        let json = serde_json::to_string_pretty(&actions).map_err(anyhow::Error::from)?;
        ui.output(&json);
        ui.output("\n");
        Ok(CommandResult::success())
    }
}
