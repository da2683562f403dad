//! Capabilities and dependency classes.
//!
//! A [`Capability`] is one atomic thing a file can require or provide:
//! a shared-library soname, an interpreter, or a managed-runtime module.
//! Its textual form is `class: name(flag flag ...)`, with the flag list
//! omitted when empty.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// The class a capability belongs to.
///
/// Declaration order is the ordering used everywhere capabilities are
/// sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepClass {
    /// Dynamic-library linkage (`soname: libfoo.so.1`).
    Soname,
    /// A script naming its interpreter (`interpreter: /usr/bin/perl`).
    Interpreter,
    /// Python module.
    Python,
    /// Java class.
    Java,
    /// CIL (.NET) assembly.
    Cil,
    /// Perl module.
    Perl,
}

impl DepClass {
    /// Every class, in ordering order.
    pub const ALL: [DepClass; 6] = [
        DepClass::Soname,
        DepClass::Interpreter,
        DepClass::Python,
        DepClass::Java,
        DepClass::Cil,
        DepClass::Perl,
    ];

    /// The tag used in capability strings and configuration keys.
    pub fn tag(self) -> &'static str {
        match self {
            DepClass::Soname => "soname",
            DepClass::Interpreter => "interpreter",
            DepClass::Python => "python",
            DepClass::Java => "java",
            DepClass::Cil => "cil",
            DepClass::Perl => "perl",
        }
    }
}

impl fmt::Display for DepClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for DepClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DepClass::ALL
            .into_iter()
            .find(|class| class.tag() == s)
            .ok_or_else(|| format!("unknown dependency class '{}'", s))
    }
}

/// An atomic `(class, name, flags)` requirement or provision.
///
/// Equality and ordering compare class, then name, then flags.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Capability {
    class: DepClass,
    name: String,
    flags: BTreeSet<String>,
}

impl Capability {
    /// Create a capability without flags.
    pub fn new(class: DepClass, name: impl Into<String>) -> Self {
        Self {
            class,
            name: name.into(),
            flags: BTreeSet::new(),
        }
    }

    /// Add a flag.
    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.insert(flag.into());
        self
    }

    /// Shorthand for a soname capability.
    pub fn soname(name: impl Into<String>) -> Self {
        Self::new(DepClass::Soname, name)
    }

    pub fn class(&self) -> DepClass {
        self.class
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn flags(&self) -> &BTreeSet<String> {
        &self.flags
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.class, self.name)?;
        if !self.flags.is_empty() {
            let flags: Vec<&str> = self.flags.iter().map(String::as_str).collect();
            write!(f, "({})", flags.join(" "))?;
        }
        Ok(())
    }
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (class, rest) = s
            .split_once(':')
            .ok_or_else(|| format!("capability '{}' has no class prefix", s))?;
        let class: DepClass = class.trim().parse()?;
        let rest = rest.trim();

        let (name, flags) = match rest.strip_suffix(')').and_then(|r| r.rsplit_once('(')) {
            Some((name, flags)) => (
                name.trim(),
                flags.split_whitespace().map(str::to_string).collect(),
            ),
            None => (rest, BTreeSet::new()),
        };

        if name.is_empty() {
            return Err(format!("capability '{}' has an empty name", s));
        }

        Ok(Self {
            class,
            name: name.to_string(),
            flags,
        })
    }
}

impl TryFrom<String> for Capability {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Capability> for String {
    fn from(value: Capability) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_soname_with_flags() {
        let cap: Capability = "soname: libfoo.so.1(ELF64 x86_64)".parse().unwrap();
        assert_eq!(cap.class(), DepClass::Soname);
        assert_eq!(cap.name(), "libfoo.so.1");
        assert!(cap.flags().contains("ELF64"));
        assert!(cap.flags().contains("x86_64"));
    }

    #[test]
    fn parses_without_flags() {
        let cap: Capability = "python: xml.dom".parse().unwrap();
        assert_eq!(cap, Capability::new(DepClass::Python, "xml.dom"));
    }

    #[test]
    fn display_round_trips_flag_order() {
        let cap = Capability::soname("libc.so.6")
            .with_flag("x86_64")
            .with_flag("ELF64");
        assert_eq!(cap.to_string(), "soname: libc.so.6(ELF64 x86_64)");
    }

    #[test]
    fn rejects_unknown_class() {
        let err = "ruby: rake".parse::<Capability>().unwrap_err();
        assert!(err.contains("ruby"));
    }

    #[test]
    fn rejects_missing_class() {
        assert!("libfoo.so.1".parse::<Capability>().is_err());
    }

    #[test]
    fn flags_take_part_in_equality() {
        let plain = Capability::soname("libfoo.so.1");
        let flagged = Capability::soname("libfoo.so.1").with_flag("ELF32");
        assert_ne!(plain, flagged);
        assert!(plain < flagged);
    }

    #[test]
    fn orders_by_class_first() {
        let soname = Capability::soname("zzz");
        let perl = Capability::new(DepClass::Perl, "aaa");
        assert!(soname < perl);
    }

    #[test]
    fn deserializes_from_yaml_string() {
        let cap: Capability = serde_yaml::from_str("\"java: org.example.Foo\"").unwrap();
        assert_eq!(cap.class(), DepClass::Java);
        assert_eq!(cap.name(), "org.example.Foo");
    }

    #[test]
    fn class_parses_from_tag() {
        for class in DepClass::ALL {
            assert_eq!(class.tag().parse::<DepClass>().unwrap(), class);
        }
    }
}
