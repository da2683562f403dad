//! Policy configuration: schema, loading, and macro substitution.
//!
//! - Schema definitions in [`schema`]
//! - File and input-document loading in [`loader`]
//! - Recipe macro substitution in [`macros`]
//!
//! # Example
//!
//! ```
//! use buildreqs::config::parse_policy_config;
//! use buildreqs::deps::DepClass;
//! use std::path::Path;
//!
//! let yaml = "classes:\n  soname:\n    exceptions: ['glibc:devel']\n";
//! let config = parse_policy_config(yaml, Path::new("policy.yml")).unwrap();
//! assert_eq!(config.class_settings(DepClass::Soname).exceptions, ["glibc:devel"]);
//! ```

pub mod loader;
pub mod macros;
pub mod schema;

pub use loader::{load_document, load_policy_config, parse_policy_config};
pub use macros::{MacroTable, DEFAULT_MACROS};
pub use schema::{
    ClassSettings, ConfigLogSettings, CorroborationConfig, GreylistEntryConfig, PolicyConfig,
};

#[cfg(test)]
mod tests {
    #[test]
    fn serde_yaml_parses_basic_yaml() {
        let yaml = "bootstrap: true\nmacros:\n  prefix: /opt";
        let parsed: serde_yaml::Value = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(parsed["bootstrap"], true);
        assert_eq!(parsed["macros"]["prefix"], "/opt");
    }
}
