//! Configuration for roadrules.
//!
//! A [`RulesConfig`] declares the rule types to register and how spatial
//! state queries behave. It loads from TOML or YAML.
//!
//! # Examples
//!
//! ```
//! use roadrules::config::{AmbiguousMatchPolicy, RulesConfig};
//!
//! let config = RulesConfig::from_yaml_str(r#"
//! query:
//!   ambiguous_match: reject
//! range_value_rule_types:
//!   - type_id: Speed-Limit Rule Type
//!     ranges:
//!       - { description: Interstate, min: 16.6, max: 27.8 }
//! discrete_value_rule_types:
//!   - type_id: Right-Of-Way Rule Type
//!     values: [Go, Stop, StopThenGo]
//! "#).unwrap();
//!
//! assert_eq!(config.query.ambiguous_match, AmbiguousMatchPolicy::Reject);
//! let registry = config.build_registry().unwrap();
//! assert_eq!(registry.len(), 2);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ValidationError;
use crate::id::RuleTypeId;
use crate::rules::{Range, RuleRegistry};

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The TOML document is malformed.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The YAML document is malformed.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The JSON document is malformed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A declared rule type failed to register.
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ValidationError),

    /// The file extension is not `.toml`, `.yaml`, `.yml` or `.json`.
    #[error("Unsupported configuration file extension: {0}")]
    UnsupportedFormat(String),
}

/// What a spatial query does when several rules of the requested type apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguousMatchPolicy {
    /// Log every match and answer with the smallest rule id.
    #[default]
    Warn,
    /// Log every match and fail with `AmbiguousRules`.
    Reject,
}

/// Behavior of state queries by road position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Handling of several rules matching one query.
    #[serde(default)]
    pub ambiguous_match: AmbiguousMatchPolicy,
}

/// A range-valued rule type declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeRuleTypeConfig {
    /// Rule type to register.
    pub type_id: RuleTypeId,
    /// Its legal ranges.
    pub ranges: Vec<Range>,
}

/// A discrete-valued rule type declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscreteRuleTypeConfig {
    /// Rule type to register.
    pub type_id: RuleTypeId,
    /// Its legal values.
    pub values: Vec<String>,
}

/// Main configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Spatial query behavior.
    #[serde(default)]
    pub query: QueryConfig,

    /// Range-valued rule types, registered first.
    #[serde(default)]
    pub range_value_rule_types: Vec<RangeRuleTypeConfig>,

    /// Discrete-valued rule types.
    #[serde(default)]
    pub discrete_value_rule_types: Vec<DiscreteRuleTypeConfig>,
}

impl RulesConfig {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file, choosing the format by extension
    /// (`.toml`, `.yaml`/`.yml` or `.json`).
    ///
    /// # Errors
    ///
    /// Returns error if the file can't be read, has another extension, or
    /// doesn't parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match extension.as_str() {
            "toml" => Self::from_toml_file(path),
            "yaml" | "yml" => Self::from_yaml_file(path),
            "json" => Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// `ConfigError::Io` if the file can't be read, `ConfigError::Toml` if
    /// it doesn't parse.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// `ConfigError::Toml` if the document doesn't parse.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// `ConfigError::Io` if the file can't be read, `ConfigError::Yaml` if
    /// it doesn't parse.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// `ConfigError::Yaml` if the document doesn't parse.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Sets the ambiguous match policy.
    #[must_use]
    pub fn with_ambiguous_match(mut self, policy: AmbiguousMatchPolicy) -> Self {
        self.query.ambiguous_match = policy;
        self
    }

    /// Registers every declared rule type into a new registry.
    ///
    /// # Errors
    ///
    /// `ConfigError::Invalid` with the first registration failure.
    pub fn build_registry(&self) -> Result<RuleRegistry, ConfigError> {
        let mut registry = RuleRegistry::new();
        for rule_type in &self.range_value_rule_types {
            registry.register_range_value_rule(rule_type.type_id.clone(), rule_type.ranges.clone())?;
        }
        for rule_type in &self.discrete_value_rule_types {
            registry
                .register_discrete_value_rule(rule_type.type_id.clone(), rule_type.values.clone())?;
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RulesConfig::new();
        assert_eq!(config.query.ambiguous_match, AmbiguousMatchPolicy::Warn);
        assert!(config.build_registry().unwrap().is_empty());
    }

    #[test]
    fn test_toml_config() {
        let config = RulesConfig::from_toml_str(
            r#"
            [query]
            ambiguous_match = "warn"

            [[range_value_rule_types]]
            type_id = "Speed-Limit Rule Type"
            ranges = [
                { description = "Residential", min = 0.0, max = 8.3 },
                { description = "Interstate", min = 16.6, max = 27.8 },
            ]

            [[discrete_value_rule_types]]
            type_id = "Direction-Usage Rule Type"
            values = ["WithS", "AgainstS"]
            "#,
        )
        .unwrap();

        let registry = config.build_registry().unwrap();
        let speed = registry
            .get_possible_states_of_rule_type(&RuleTypeId::new("Speed-Limit Rule Type"))
            .unwrap();
        assert_eq!(speed.range_values().unwrap().len(), 2);
        assert!(registry.is_registered(&RuleTypeId::new("Direction-Usage Rule Type")));
    }

    #[test]
    fn test_missing_query_section_defaults_to_warn() {
        let config = RulesConfig::from_yaml_str("discrete_value_rule_types: []\n").unwrap();
        assert_eq!(config.query, QueryConfig::default());
    }

    #[test]
    fn test_unknown_policy_is_parse_error() {
        let err = RulesConfig::from_yaml_str("query:\n  ambiguous_match: panic\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_duplicate_type_is_invalid() {
        let config = RulesConfig::from_yaml_str(
            r#"
discrete_value_rule_types:
  - type_id: T
    values: [a]
range_value_rule_types:
  - type_id: T
    ranges: [{ description: d, min: 0, max: 1 }]
"#,
        )
        .unwrap();
        assert!(matches!(
            config.build_registry(),
            Err(ConfigError::Invalid(ValidationError::DuplicateRuleType { .. }))
        ));
    }

    #[test]
    fn test_with_ambiguous_match() {
        let config = RulesConfig::new().with_ambiguous_match(AmbiguousMatchPolicy::Reject);
        assert_eq!(config.query.ambiguous_match, AmbiguousMatchPolicy::Reject);
    }
}
