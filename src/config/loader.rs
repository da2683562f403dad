//! Loading of the policy file and the analysis input documents.
//!
//! Everything is YAML; JSON documents load too, being valid YAML.

use crate::config::schema::PolicyConfig;
use crate::error::{BuildReqsError, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Load a policy configuration file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_policy_config(path: &Path) -> Result<PolicyConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            BuildReqsError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            BuildReqsError::Io(e)
        }
    })?;

    parse_policy_config(&content, path)
}

/// Parse YAML content into a [`PolicyConfig`].
///
/// # Arguments
///
/// * `content` - The YAML content to parse
/// * `source_path` - Path for error reporting
pub fn parse_policy_config(content: &str, source_path: &Path) -> Result<PolicyConfig> {
    if content.trim().is_empty() {
        return Ok(PolicyConfig::default());
    }
    parse_document(content, source_path)
}

/// Load a required input document (package description, database
/// snapshot).
///
/// # Errors
///
/// Returns `InputNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the content does not match `T`.
pub fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            BuildReqsError::InputNotFound {
                path: path.to_path_buf(),
            }
        } else {
            BuildReqsError::Io(e)
        }
    })?;

    parse_document(&content, path)
}

fn parse_document<T: DeserializeOwned>(content: &str, source_path: &Path) -> Result<T> {
    serde_yaml::from_str(content).map_err(|e| BuildReqsError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deps::DepClass;
    use tempfile::TempDir;

    #[test]
    fn missing_config_is_config_not_found() {
        let temp = TempDir::new().unwrap();
        let err = load_policy_config(&temp.path().join("policy.yml")).unwrap_err();
        assert!(matches!(err, BuildReqsError::ConfigNotFound { .. }));
    }

    #[test]
    fn missing_input_is_input_not_found() {
        let temp = TempDir::new().unwrap();
        let err = load_document::<PolicyConfig>(&temp.path().join("pkg.yml")).unwrap_err();
        assert!(matches!(err, BuildReqsError::InputNotFound { .. }));
    }

    #[test]
    fn empty_config_file_is_default() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("policy.yml");
        fs::write(&path, "\n").unwrap();
        let config = load_policy_config(&path).unwrap();
        assert!(config.classes.is_empty());
    }

    #[test]
    fn invalid_yaml_reports_path() {
        let err = parse_policy_config("classes: [", Path::new("bad.yml")).unwrap_err();
        match err {
            BuildReqsError::ConfigParseError { path, .. } => {
                assert_eq!(path, Path::new("bad.yml"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn loads_json_documents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("policy.json");
        fs::write(&path, r#"{"classes": {"cil": {"enabled": false}}}"#).unwrap();
        let config = load_policy_config(&path).unwrap();
        assert!(!config.class_settings(DepClass::Cil).enabled);
    }
}
