//! Recipe macro substitution for configuration values.
//!
//! Exception and greylist entries may reference recipe macros using the
//! `%(name)s` syntax.
//!
//! # Syntax
//!
//! - `%(name)s` - replaced with the macro's value
//! - `%%` - a literal `%`
//! - any other `%` is kept as-is
//!
//! # Example
//!
//! ```
//! use buildreqs::config::MacroTable;
//!
//! let macros = MacroTable::with_defaults();
//! assert_eq!(macros.expand("%(bindir)s/bison").unwrap(), "/usr/bin/bison");
//! ```

use crate::error::{BuildReqsError, Result};
use std::collections::BTreeMap;

/// Macro values that would otherwise come from a recipe.
pub const DEFAULT_MACROS: &[(&str, &str)] = &[
    ("prefix", "/usr"),
    ("exec_prefix", "%(prefix)s"),
    ("bindir", "%(exec_prefix)s/bin"),
    ("sbindir", "%(exec_prefix)s/sbin"),
    ("libdir", "%(exec_prefix)s/lib"),
    ("libexecdir", "%(exec_prefix)s/libexec"),
    ("datadir", "%(prefix)s/share"),
    ("includedir", "%(prefix)s/include"),
    ("sysconfdir", "/etc"),
    ("localstatedir", "/var"),
];

/// Nesting deeper than this is treated as a self-referencing macro.
const MAX_DEPTH: usize = 16;

/// A segment of a macro-bearing string.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text
    Literal(String),
    /// Macro reference: %(name)s
    Macro(String),
}

/// Parse a string containing `%(name)s` references.
pub fn parse_macros(input: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current_literal = String::new();
    let mut rest = input;

    while let Some(pos) = rest.find('%') {
        current_literal.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(tail) = after.strip_prefix('%') {
            current_literal.push('%');
            rest = tail;
            continue;
        }

        let reference = after
            .strip_prefix('(')
            .and_then(|inner| inner.split_once(')'))
            .and_then(|(name, tail)| tail.strip_prefix('s').map(|tail| (name, tail)));

        match reference {
            Some((name, tail)) if !name.is_empty() => {
                if !current_literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut current_literal)));
                }
                segments.push(Segment::Macro(name.to_string()));
                rest = tail;
            }
            _ => {
                current_literal.push('%');
                rest = after;
            }
        }
    }
    current_literal.push_str(rest);

    if !current_literal.is_empty() {
        segments.push(Segment::Literal(current_literal));
    }

    segments
}

/// Named macro values.
///
/// Values may themselves reference other macros; expansion is recursive.
#[derive(Debug, Clone, Default)]
pub struct MacroTable {
    values: BTreeMap<String, String>,
}

impl MacroTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table holding [`DEFAULT_MACROS`].
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        for (name, value) in DEFAULT_MACROS {
            table.set(*name, *value);
        }
        table
    }

    /// Define or replace a macro.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Layer `overrides` on top of this table.
    pub fn merged(mut self, overrides: &BTreeMap<String, String>) -> Self {
        for (name, value) in overrides {
            self.set(name.clone(), value.clone());
        }
        self
    }

    /// Raw, unexpanded value of a macro.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Expand every macro reference in `input`.
    ///
    /// # Errors
    ///
    /// Returns `UnresolvedMacro` if a referenced macro is undefined or
    /// refers back to itself.
    pub fn expand(&self, input: &str) -> Result<String> {
        self.expand_at(input, input, 0)
    }

    fn expand_at(&self, input: &str, origin: &str, depth: usize) -> Result<String> {
        let mut result = String::new();

        for segment in parse_macros(input) {
            match segment {
                Segment::Literal(text) => result.push_str(&text),
                Segment::Macro(name) => {
                    let value = self
                        .values
                        .get(&name)
                        .filter(|_| depth < MAX_DEPTH)
                        .ok_or_else(|| BuildReqsError::UnresolvedMacro {
                            name: name.clone(),
                            input: origin.to_string(),
                        })?;
                    result.push_str(&self.expand_at(value, origin, depth + 1)?);
                }
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_literal_only() {
        assert_eq!(
            parse_macros("/usr/bin/bison"),
            vec![Segment::Literal("/usr/bin/bison".to_string())]
        );
    }

    #[test]
    fn parse_macro_with_surrounding_text() {
        assert_eq!(
            parse_macros("%(bindir)s/g77"),
            vec![
                Segment::Macro("bindir".to_string()),
                Segment::Literal("/g77".to_string()),
            ]
        );
    }

    #[test]
    fn parse_escaped_percent() {
        assert_eq!(
            parse_macros("100%% sure"),
            vec![Segment::Literal("100% sure".to_string())]
        );
    }

    #[test]
    fn parse_stray_percent_is_literal() {
        assert_eq!(
            parse_macros("50% (s)"),
            vec![Segment::Literal("50% (s)".to_string())]
        );
    }

    #[test]
    fn parse_requires_s_conversion() {
        assert_eq!(
            parse_macros("%(name)d"),
            vec![Segment::Literal("%(name)d".to_string())]
        );
    }

    #[test]
    fn expands_nested_defaults() {
        let macros = MacroTable::with_defaults();
        assert_eq!(macros.expand("%(bindir)s/g77").unwrap(), "/usr/bin/g77");
        assert_eq!(
            macros.expand("%(prefix)s/X11R6/bin/makedepend").unwrap(),
            "/usr/X11R6/bin/makedepend"
        );
    }

    #[test]
    fn overrides_flow_through_dependents() {
        let mut overrides = BTreeMap::new();
        overrides.insert("prefix".to_string(), "/opt".to_string());
        let macros = MacroTable::with_defaults().merged(&overrides);
        assert_eq!(macros.expand("%(bindir)s").unwrap(), "/opt/bin");
    }

    #[test]
    fn unknown_macro_is_an_error() {
        let err = MacroTable::new().expand("%(nope)s/x").unwrap_err();
        assert!(matches!(err, BuildReqsError::UnresolvedMacro { ref name, .. } if name == "nope"));
    }

    #[test]
    fn self_reference_is_an_error() {
        let mut macros = MacroTable::new();
        macros.set("loop", "%(loop)s");
        assert!(macros.expand("%(loop)s").is_err());
    }

    #[test]
    fn regex_text_survives() {
        let macros = MacroTable::with_defaults();
        assert_eq!(
            macros.expand(r"\s*(AC_PROG_YACC|YACC=)").unwrap(),
            r"\s*(AC_PROG_YACC|YACC=)"
        );
    }
}
