//! Integration tests for config module public API.

use buildreqs::config::{load_policy_config, MacroTable, PolicyConfig};
use buildreqs::deps::DepClass;
use buildreqs::policy::{ExceptionFilter, Greylist, Severity};
use buildreqs::BuildReqsError;
use std::fs;
use tempfile::TempDir;

#[test]
fn full_policy_file_loads() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("policy.yml");
    fs::write(
        &path,
        r#"
macros:
  prefix: /opt/app
classes:
  soname:
    exceptions: ["foo:devel", "glibc:.*"]
    severity: warning
  java:
    enabled: false
config_log:
  exceptions: ["%(bindir)s/m4", "flex:runtime"]
  greylist:
    - path: "%(bindir)s/yacc"
      corroborate:
        - { file: configure.ac, pattern: '\s*AC_PROG_YACC' }
"#,
    )
    .unwrap();

    let config = load_policy_config(&path).unwrap();
    assert_eq!(config.severity_for(DepClass::Soname, Severity::Error), Severity::Warning);
    assert!(!config.class_settings(DepClass::Java).enabled);
    assert!(config.class_settings(DepClass::Python).enabled);

    let macros = MacroTable::with_defaults().merged(&config.macros);
    assert_eq!(macros.expand("%(bindir)s").unwrap(), "/opt/app/bin");

    let filter =
        ExceptionFilter::compile(&config.class_settings(DepClass::Soname).exceptions, &macros)
            .unwrap();
    assert!(filter.matches("glibc:devel"));

    let greylist = Greylist::compile(config.config_log.greylist.as_deref().unwrap(), &macros)
        .unwrap();
    assert_eq!(greylist.len(), 1);
    assert!(greylist.suppresses("/opt/app/bin/yacc", temp.path()).unwrap());
}

#[test]
fn empty_file_is_default_config() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("policy.yml");
    fs::write(&path, "\n").unwrap();
    let config = load_policy_config(&path).unwrap();
    assert!(!config.bootstrap);
    assert!(config.config_log.enabled);
}

#[test]
fn missing_file_is_config_not_found() {
    let temp = TempDir::new().unwrap();
    let err = load_policy_config(&temp.path().join("nope.yml")).unwrap_err();
    assert!(matches!(err, BuildReqsError::ConfigNotFound { .. }));
}

#[test]
fn invalid_yaml_is_parse_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("policy.yml");
    fs::write(&path, "classes: [not, a, map]\n").unwrap();
    let err = load_policy_config(&path).unwrap_err();
    assert!(matches!(err, BuildReqsError::ConfigParseError { .. }));
}

#[test]
fn bootstrap_forces_warnings() {
    let config = PolicyConfig {
        bootstrap: true,
        ..Default::default()
    };
    for class in DepClass::ALL {
        assert_eq!(config.severity_for(class, Severity::Error), Severity::Warning);
    }
    assert_eq!(config.config_log_severity(), Severity::Warning);
}

#[test]
fn unknown_macro_in_greylist_fails() {
    let config: PolicyConfig = serde_yaml_from(
        "config_log:\n  greylist:\n    - path: '%(nowhere)s/bin/flex'\n",
    );
    let err = Greylist::compile(
        config.config_log.greylist.as_deref().unwrap(),
        &MacroTable::with_defaults(),
    )
    .unwrap_err();
    assert!(matches!(err, BuildReqsError::UnresolvedMacro { ref name, .. } if name == "nowhere"));
}

fn serde_yaml_from(yaml: &str) -> PolicyConfig {
    buildreqs::config::parse_policy_config(yaml, std::path::Path::new("inline.yml")).unwrap()
}
