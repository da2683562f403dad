//! Human-readable output formatter.

use super::{count, Finding, ReportFormatter};
use crate::policy::Severity;
use crate::ui::Theme;
use std::collections::BTreeSet;
use std::io::Write;

/// Formats check output for terminal display.
pub struct HumanFormatter {
    theme: Theme,
}

impl HumanFormatter {
    /// Create a new human formatter.
    pub fn new(use_color: bool) -> Self {
        let theme = if use_color {
            Theme::new()
        } else {
            Theme::plain()
        };
        Self { theme }
    }
}

impl ReportFormatter for HumanFormatter {
    fn format<W: Write>(
        &self,
        findings: &[Finding],
        missing: &BTreeSet<String>,
        writer: &mut W,
    ) -> std::io::Result<()> {
        for finding in findings {
            // Header line: error[Policy]: message
            writeln!(
                writer,
                "{}[{}]: {}",
                self.theme
                    .severity(finding.severity)
                    .apply_to(finding.severity.to_string()),
                finding.policy,
                finding.message
            )?;
            if let Some(ref path) = finding.path {
                writeln!(writer, "  --> {}", self.theme.dim.apply_to(path.display()))?;
            }
        }

        let errors = count(findings, Severity::Error);
        let warnings = count(findings, Severity::Warning);
        if errors == 0 && warnings == 0 {
            return Ok(());
        }

        writeln!(writer)?;
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(String::as_str).collect();
            writeln!(
                writer,
                "{} {}",
                self.theme.highlight.apply_to("Missing build requirements:"),
                names.join(" ")
            )?;
        }
        writeln!(
            writer,
            "{}",
            self.theme.highlight.apply_to(format!(
                "Found {} error(s) and {} warning(s)",
                errors, warnings
            ))
        )?;

        Ok(())
    }
}
