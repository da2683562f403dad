//! Configuration schema definitions.
//!
//! This module contains the struct definitions that map to the YAML
//! policy configuration file.

use crate::deps::DepClass;
use crate::policy::Severity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Root configuration structure for a policy file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Bootstrap builds only ever warn.
    #[serde(skip_serializing_if = "is_false")]
    pub bootstrap: bool,

    /// Skip the config.log enforcer entirely.
    #[serde(skip_serializing_if = "is_false")]
    pub ignore_deps: bool,

    /// Recipe macros, layered over the built-in defaults.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub macros: BTreeMap<String, String>,

    /// Per dependency-class enforcer settings.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub classes: BTreeMap<DepClass, ClassSettings>,

    /// config.log enforcer settings.
    pub config_log: ConfigLogSettings,
}

/// Settings for one dependency-class enforcer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassSettings {
    /// Whether this enforcer runs at all.
    pub enabled: bool,

    /// Component names (`pkg:comp`) or regexes never to suggest.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exceptions: Vec<String>,

    /// Overrides the class's default severity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

impl Default for ClassSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            exceptions: Vec::new(),
            severity: None,
        }
    }
}

/// Settings for the config.log enforcer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigLogSettings {
    pub enabled: bool,

    /// Found paths (containing `/`) or component names to ignore.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exceptions: Vec<String>,

    /// Replaces the built-in greylist when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub greylist: Option<Vec<GreylistEntryConfig>>,

    /// Logs to scan in addition to any found under the build directory.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub logs: Vec<PathBuf>,

    #[serde(default = "default_config_log_severity")]
    pub severity: Severity,
}

impl Default for ConfigLogSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            exceptions: Vec::new(),
            greylist: None,
            logs: Vec::new(),
            severity: default_config_log_severity(),
        }
    }
}

fn default_config_log_severity() -> Severity {
    Severity::Warning
}

/// A greylisted found-path and the evidence that lifts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GreylistEntryConfig {
    /// Exact path as it appears in config.log, macros allowed.
    pub path: String,

    /// Sibling files and line patterns; empty means always suppressed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub corroborate: Vec<CorroborationConfig>,
}

/// One `(file, line pattern)` corroboration pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorroborationConfig {
    /// File name relative to the directory holding config.log.
    pub file: String,
    /// Regex matched from the start of each line.
    pub pattern: String,
}

impl PolicyConfig {
    /// Settings for a class, falling back to defaults.
    pub fn class_settings(&self, class: DepClass) -> ClassSettings {
        self.classes.get(&class).cloned().unwrap_or_default()
    }

    /// The severity an enforcer reports with.
    ///
    /// Bootstrap builds always warn; otherwise an explicit setting wins
    /// over the enforcer's default.
    pub fn severity_for(&self, class: DepClass, default: Severity) -> Severity {
        if self.bootstrap {
            return Severity::Warning;
        }
        self.classes
            .get(&class)
            .and_then(|settings| settings.severity)
            .unwrap_or(default)
    }

    /// Severity for config.log findings.
    pub fn config_log_severity(&self) -> Severity {
        if self.bootstrap {
            Severity::Warning
        } else {
            self.config_log.severity
        }
    }
}

fn is_false(v: &bool) -> bool {
    !v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config: PolicyConfig = serde_yaml::from_str("{}").unwrap();
        assert!(!config.bootstrap);
        assert!(config.config_log.enabled);
        assert!(config.config_log.greylist.is_none());
        assert_eq!(config.config_log.severity, Severity::Warning);
        assert!(config.class_settings(DepClass::Soname).enabled);
    }

    #[test]
    fn parses_class_settings() {
        let yaml = r#"
classes:
  soname:
    exceptions: ["foo:devel", "glibc:.*"]
    severity: warning
  perl:
    enabled: false
"#;
        let config: PolicyConfig = serde_yaml::from_str(yaml).unwrap();
        let soname = config.class_settings(DepClass::Soname);
        assert_eq!(soname.exceptions.len(), 2);
        assert_eq!(soname.severity, Some(Severity::Warning));
        assert!(!config.class_settings(DepClass::Perl).enabled);
    }

    #[test]
    fn parses_greylist() {
        let yaml = r#"
config_log:
  greylist:
    - path: "%(bindir)s/bison"
      corroborate:
        - file: configure.ac
          pattern: '\s*AC_PROC_YACC'
    - path: "%(prefix)s/X11R6/bin/makedepend"
"#;
        let config: PolicyConfig = serde_yaml::from_str(yaml).unwrap();
        let greylist = config.config_log.greylist.unwrap();
        assert_eq!(greylist.len(), 2);
        assert_eq!(greylist[0].corroborate[0].file, "configure.ac");
        assert!(greylist[1].corroborate.is_empty());
    }

    #[test]
    fn bootstrap_forces_warnings() {
        let yaml = "bootstrap: true\nclasses:\n  soname:\n    severity: error\n";
        let config: PolicyConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            config.severity_for(DepClass::Soname, Severity::Error),
            Severity::Warning
        );
        assert_eq!(config.config_log_severity(), Severity::Warning);
    }

    #[test]
    fn explicit_severity_overrides_default() {
        let yaml = "classes:\n  python:\n    severity: error\n";
        let config: PolicyConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            config.severity_for(DepClass::Python, Severity::Warning),
            Severity::Error
        );
        assert_eq!(
            config.severity_for(DepClass::Java, Severity::Warning),
            Severity::Warning
        );
    }

    #[test]
    fn rejects_unknown_class_keys() {
        let yaml = "classes:\n  ruby:\n    enabled: false\n";
        assert!(serde_yaml::from_str::<PolicyConfig>(yaml).is_err());
    }
}
