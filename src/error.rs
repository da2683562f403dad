//! Error types for buildreqs operations.
//!
//! This module defines [`BuildReqsError`], the primary error type used
//! throughout the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Configuration problems (bad patterns, bad greylist entries, unknown
//!   macros) fail the analysis pass immediately
//! - A capability nobody provides is *not* an error; it is reported
//! - Use `anyhow::Error` (via `BuildReqsError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for buildreqs operations.
#[derive(Debug, Error)]
pub enum BuildReqsError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse a configuration or input document.
    #[error("Failed to parse {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// An exception or corroboration pattern is not a valid regex.
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A greylist entry is structurally unusable.
    #[error("Invalid greylist entry '{entry}': {message}")]
    InvalidGreylist { entry: String, message: String },

    /// A `%(name)s` macro has no value.
    #[error("Unresolved macro %({name})s in '{input}'")]
    UnresolvedMacro { name: String, input: String },

    /// A file the analysis was explicitly told to read does not exist.
    #[error("Required input not found: {path}")]
    InputNotFound { path: PathBuf },

    /// The component database could not answer a query.
    #[error("Database error: {message}")]
    DatabaseError { message: String },

    /// A manifest line could not be parsed.
    #[error("Manifest {path}:{line}: {message}")]
    ManifestParseError {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for buildreqs operations.
pub type Result<T> = std::result::Result<T, BuildReqsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_not_found_displays_path() {
        let err = BuildReqsError::ConfigNotFound {
            path: PathBuf::from("/foo/policy.yml"),
        };
        assert!(err.to_string().contains("/foo/policy.yml"));
    }

    #[test]
    fn invalid_pattern_displays_pattern_and_message() {
        let err = BuildReqsError::InvalidPattern {
            pattern: "foo[".into(),
            message: "unclosed character class".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("foo["));
        assert!(msg.contains("unclosed character class"));
    }

    #[test]
    fn unresolved_macro_uses_recipe_syntax() {
        let err = BuildReqsError::UnresolvedMacro {
            name: "libdir".into(),
            input: "%(libdir)s/foo".into(),
        };
        assert!(err.to_string().contains("%(libdir)s"));
    }

    #[test]
    fn manifest_error_displays_location() {
        let err = BuildReqsError::ManifestParseError {
            path: PathBuf::from("MANIFEST"),
            line: 7,
            message: "missing owner".into(),
        };
        assert_eq!(err.to_string(), "Manifest MANIFEST:7: missing owner");
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: BuildReqsError = io_err.into();
        assert!(matches!(err, BuildReqsError::Io(_)));
    }

    #[test]
    fn result_type_alias_works() {
        fn returns_error() -> Result<()> {
            Err(BuildReqsError::DatabaseError {
                message: "closed".into(),
            })
        }
        assert!(returns_error().is_err());
    }
}
