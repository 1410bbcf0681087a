// Copyright AGNTCY Contributors (https://github.com/agntcy)
// SPDX-License-Identifier: Apache-2.0

//! YAML configuration for rule tables and default deadlines.

use std::path::Path;
use std::time::Duration;

use duration_str::deserialize_duration;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ConfigurationError;
use crate::requirement::Requirement;
use crate::table::{RuleTable, RuleTableBuilder};

pub trait Configuration {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Validate the configuration
    fn validate(&self) -> Result<(), Self::Error>;
}

/// Parse a configuration from a YAML string.
pub fn from_yaml_str<T: DeserializeOwned>(contents: &str) -> Result<T, ConfigurationError> {
    Ok(serde_yaml::from_str(contents)?)
}

/// Read and parse a YAML configuration file.
pub fn from_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigurationError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigurationError::Io {
        path: path.display().to_string(),
        source,
    })?;

    debug!(path = %path.display(), "loaded configuration file");
    from_yaml_str(&contents)
}

/// A single authorization rule.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct RuleConfig {
    /// Method pattern: `Service/Method`, `Service/*` (or `Service.*`), `*/Method` or `*`.
    pub method: String,

    /// Requirement applied to calls matching `method`.
    #[serde(with = "serde_yaml::with::singleton_map")]
    #[schemars(with = "Requirement")]
    pub require: Requirement,
}

impl RuleConfig {
    pub fn new(method: impl Into<String>, require: Requirement) -> Self {
        RuleConfig {
            method: method.into(),
            require,
        }
    }
}

/// Ordered authorization rules. Calls matched by no rule are denied.
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct AuthorizationConfig {
    /// Rules, checked in order. The first match decides.
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

impl AuthorizationConfig {
    pub fn new(rules: Vec<RuleConfig>) -> Self {
        AuthorizationConfig { rules }
    }

    pub fn with_rule(mut self, method: impl Into<String>, require: Requirement) -> Self {
        self.rules.push(RuleConfig::new(method, require));
        self
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigurationError> {
        let config: Self = from_yaml_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let config: Self = from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Build the immutable rule table described by this configuration.
    pub fn to_rule_table(&self) -> Result<RuleTable, ConfigurationError> {
        self.rules
            .iter()
            .fold(RuleTableBuilder::new(), |builder, rule| {
                builder.add_rule(rule.method.as_str(), rule.require.clone())
            })
            .build()
    }
}

impl From<RuleTable> for AuthorizationConfig {
    fn from(table: RuleTable) -> Self {
        AuthorizationConfig {
            rules: table
                .rules()
                .iter()
                .map(|rule| RuleConfig::new(rule.pattern().as_str(), rule.requirement().clone()))
                .collect(),
        }
    }
}

impl Configuration for AuthorizationConfig {
    type Error = ConfigurationError;

    fn validate(&self) -> Result<(), Self::Error> {
        match self.rules.iter().position(|rule| rule.method.is_empty()) {
            Some(index) => Err(ConfigurationError::EmptyPattern { index }),
            None => Ok(()),
        }
    }
}

/// Default deadline applied to outbound calls that do not set one.
#[derive(Debug, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct DeadlineConfig {
    /// Deadline as a duration string (`"30s"`, `"250ms"`, ...)
    #[serde(
        default = "default_deadline",
        deserialize_with = "deserialize_duration"
    )]
    #[schemars(with = "String")]
    default_deadline: Duration,
}

impl Default for DeadlineConfig {
    fn default() -> Self {
        DeadlineConfig {
            default_deadline: default_deadline(),
        }
    }
}

fn default_deadline() -> Duration {
    Duration::from_secs(30)
}

impl DeadlineConfig {
    pub fn new(default_deadline: Duration) -> Self {
        DeadlineConfig { default_deadline }
    }

    pub fn default_deadline(&self) -> Duration {
        self.default_deadline
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigurationError> {
        let config: Self = from_yaml_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let config: Self = from_file(path)?;
        config.validate()?;
        Ok(config)
    }
}

impl Configuration for DeadlineConfig {
    type Error = ConfigurationError;

    fn validate(&self) -> Result<(), Self::Error> {
        if self.default_deadline.is_zero() {
            return Err(ConfigurationError::InvalidDeadline(
                "default deadline must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::Decision;
    use crate::principal::Principal;

    const SAMPLE: &str = r#"
rules:
  - method: "Simple/StreamHello"
    require:
      has_authority: SCOPE_profile
  - method: "Simple/SayHello"
    require: authenticated
  - method: "*"
    require: deny_all
"#;

    #[test]
    fn test_authorization_config() {
        let config = AuthorizationConfig::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(config.rules.len(), 3);
        assert_eq!(
            config.rules[0],
            RuleConfig::new(
                "Simple/StreamHello",
                Requirement::has_authority("SCOPE_profile")
            )
        );

        let table = config.to_rule_table().unwrap();
        assert_eq!(table.evaluate("Simple/SayHello", None), Decision::Deny);
        assert_eq!(
            table.evaluate("Simple/SayHello", Some(&Principal::new("user"))),
            Decision::Allow
        );
        assert_eq!(
            table.evaluate("Other/Method", Some(&Principal::new("user"))),
            Decision::Deny
        );
    }

    #[test]
    fn test_config_builder() {
        let config = AuthorizationConfig::default()
            .with_rule("Simple/*", Requirement::Authenticated)
            .with_rule("*", Requirement::PermitAll);

        assert!(config.validate().is_ok());
        let table = config.to_rule_table().unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.evaluate("Other/Method", None), Decision::Allow);
    }

    #[test]
    fn test_empty_method_rejected() {
        let yaml = "rules:\n  - method: Simple/SayHello\n    require: permit_all\n  - method: \"\"\n    require: permit_all\n";
        match AuthorizationConfig::from_yaml_str(yaml) {
            Err(ConfigurationError::EmptyPattern { index }) => assert_eq!(index, 1),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_requirement_rejected() {
        let yaml = "rules:\n  - method: Simple/SayHello\n    require: maybe\n";
        assert!(matches!(
            AuthorizationConfig::from_yaml_str(yaml),
            Err(ConfigurationError::Parse(_))
        ));
    }

    #[test]
    fn test_empty_config() {
        let config = AuthorizationConfig::from_yaml_str("{}").unwrap();
        assert!(config.rules.is_empty());
        assert!(config.to_rule_table().unwrap().is_empty());
    }

    #[test]
    fn test_missing_file() {
        let res = AuthorizationConfig::from_file("/this/path/does/not/exist.yaml");
        assert!(matches!(res, Err(ConfigurationError::Io { .. })));
    }

    #[test]
    fn test_deadline_config() {
        let config = DeadlineConfig::default();
        assert_eq!(config.default_deadline(), Duration::from_secs(30));
        assert!(config.validate().is_ok());

        let config: DeadlineConfig = from_yaml_str("default_deadline: 250ms").unwrap();
        assert_eq!(config.default_deadline(), Duration::from_millis(250));

        let config: DeadlineConfig = from_yaml_str("{}").unwrap();
        assert_eq!(config.default_deadline(), Duration::from_secs(30));

        let config = DeadlineConfig::new(Duration::ZERO);
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidDeadline(_))
        ));

        assert!(from_yaml_str::<DeadlineConfig>("default_deadline: soon").is_err());
    }

    #[test]
    fn test_zero_deadline_rejected_on_load() {
        assert!(matches!(
            DeadlineConfig::from_yaml_str("default_deadline: 0s"),
            Err(ConfigurationError::InvalidDeadline(_))
        ));

        let config = DeadlineConfig::from_yaml_str("default_deadline: 2s").unwrap();
        assert_eq!(config.default_deadline(), Duration::from_secs(2));
    }

    #[test]
    fn test_rules_round_trip_in_config_format() {
        let config = AuthorizationConfig::default()
            .with_rule("Simple/StreamHello", Requirement::has_authority("SCOPE_profile"))
            .with_rule("Admin/*", Requirement::has_any_authority(["ROLE_admin", "ROLE_ops"]))
            .with_rule("*", Requirement::DenyAll);

        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(yaml.contains("has_authority: SCOPE_profile"));
        assert!(!yaml.contains('!'));

        let decoded = AuthorizationConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(decoded, config);
    }

    #[test]
    fn test_schema() {
        let schema = schemars::schema_for!(AuthorizationConfig);
        let json = serde_json::to_string(&schema).unwrap();
        assert!(json.contains("rules"));
        assert!(json.contains("has_authority"));
    }
}
