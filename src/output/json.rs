//! JSON output formatter.
//!
//! Formats check results as machine-readable JSON for recipe tooling.

use super::{count, Finding, ReportFormatter};
use crate::policy::Severity;
use serde::Serialize;
use std::collections::BTreeSet;
use std::io::Write;

/// Formats check output as JSON.
pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonOutput<'a> {
    findings: &'a [Finding],
    missing_build_requires: &'a BTreeSet<String>,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonSummary {
    total: usize,
    errors: usize,
    warnings: usize,
}

impl JsonFormatter {
    /// Create a new JSON formatter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonFormatter {
    fn format<W: Write>(
        &self,
        findings: &[Finding],
        missing: &BTreeSet<String>,
        writer: &mut W,
    ) -> std::io::Result<()> {
        let output = JsonOutput {
            findings,
            missing_build_requires: missing,
            summary: JsonSummary {
                total: findings.len(),
                errors: count(findings, Severity::Error),
                warnings: count(findings, Severity::Warning),
            },
        };

        serde_json::to_writer_pretty(&mut *writer, &output).map_err(std::io::Error::other)?;
        writeln!(writer)?;

        Ok(())
    }
}
