//! Report output.
//!
//! Enforcers produce [`Finding`]s; a [`ReportFormatter`] writes them out
//! together with the coalesced list of build requirements to add.

pub mod human;
pub mod json;

use crate::policy::Severity;
use serde::Serialize;
use std::collections::BTreeSet;
use std::io::Write;
use std::path::PathBuf;

pub use human::HumanFormatter;
pub use json::JsonFormatter;

/// One reported message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Name of the enforcer that produced it.
    pub policy: String,
    pub severity: Severity,
    pub message: String,
    /// File or found path the message is about.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Finding {
    /// Create a new finding.
    pub fn new(policy: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            policy: policy.into(),
            severity,
            message: message.into(),
            path: None,
        }
    }

    /// Attach the path the finding is about.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// Output format for check results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

/// Trait for formatting check output.
pub trait ReportFormatter {
    /// Write findings and the suggested additions to `writer`.
    fn format<W: Write>(
        &self,
        findings: &[Finding],
        missing: &BTreeSet<String>,
        writer: &mut W,
    ) -> std::io::Result<()>;
}

/// Count findings at `severity`.
pub fn count(findings: &[Finding], severity: Severity) -> usize {
    findings.iter().filter(|f| f.severity == severity).count()
}
