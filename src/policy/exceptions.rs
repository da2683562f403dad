//! Exception filters for suggested component names.
//!
//! An exception is either a literal `package:component` name or a regex.
//! Regexes match from the start of the candidate name, so `glibc:.*`
//! excepts every glibc component and `.*` excepts everything.

use crate::config::MacroTable;
use crate::error::{BuildReqsError, Result};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// What a literal component name looks like.
static COMPONENT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]+:[a-zA-Z0-9]+$").unwrap());

/// Compile a user pattern so it matches from the start of the input.
pub(crate) fn compile_prefix_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{})", pattern)).map_err(|e| BuildReqsError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// Literal names plus compiled patterns, built once per pass.
#[derive(Debug, Clone, Default)]
pub struct ExceptionFilter {
    literals: BTreeSet<String>,
    patterns: Vec<Regex>,
}

impl ExceptionFilter {
    /// A filter that excepts nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Expand macros in each raw exception and sort it into the literal
    /// or pattern set.
    ///
    /// # Errors
    ///
    /// Returns `UnresolvedMacro` or `InvalidPattern` on the first bad
    /// entry.
    pub fn compile<S: AsRef<str>>(raw: &[S], macros: &MacroTable) -> Result<Self> {
        let mut filter = Self::empty();
        for exception in raw {
            let exception = macros.expand(exception.as_ref())?;
            if COMPONENT_NAME.is_match(&exception) {
                filter.literals.insert(exception);
            } else {
                filter.patterns.push(compile_prefix_pattern(&exception)?);
            }
        }
        Ok(filter)
    }

    /// Whether `name` is excepted.
    pub fn matches(&self, name: &str) -> bool {
        self.literals.contains(name) || self.patterns.iter().any(|p| p.is_match(name))
    }

    /// Remove every excepted name from `candidates`.
    pub fn filter(&self, candidates: &mut BTreeSet<String>) {
        candidates.retain(|name| !self.matches(name));
    }

    pub fn literal_count(&self) -> usize {
        self.literals.len()
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty() && self.patterns.is_empty()
    }
}
