//! Configuration for concurrent trees.
//!
//! Supports YAML file and environment variable overrides.

use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "RBKV_CONFIG";
/// Config file read when `RBKV_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "rbkv.yaml";
/// Overrides [`TreeConfig::duplicate_policy`].
pub const DUPLICATE_POLICY_ENV: &str = "RBKV_DUPLICATE_POLICY";
/// Overrides [`TreeConfig::initial_capacity`].
pub const INITIAL_CAPACITY_ENV: &str = "RBKV_INITIAL_CAPACITY";

/// What an insert does when the key is already present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Replace the stored value and hand the old one back.
    #[default]
    Overwrite,
    /// Leave the tree unchanged and fail with `TreeError::DuplicateKey`.
    Reject,
}

impl FromStr for DuplicatePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overwrite" => Ok(Self::Overwrite),
            "reject" => Ok(Self::Reject),
            _ => Err(ConfigError::InvalidValue {
                name: DUPLICATE_POLICY_ENV.to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Tree configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Duplicate key handling on insert.
    pub duplicate_policy: DuplicatePolicy,
    /// Node slots reserved up front.
    pub initial_capacity: usize,
}

impl TreeConfig {
    /// Load configuration from file and environment.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file
    /// 3. Defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        Self::load_from(&config_path, |name| std::env::var(name).ok())
    }

    /// Load from `path` if it exists, then apply overrides from `lookup`.
    fn load_from(
        path: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };

        config.apply_overrides(lookup)?;

        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;

        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    ///
    /// Unlike unset variables, malformed values are an error.
    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(policy) = lookup(DUPLICATE_POLICY_ENV) {
            self.duplicate_policy = policy.parse()?;
        }

        if let Some(capacity) = lookup(INITIAL_CAPACITY_ENV) {
            self.initial_capacity =
                capacity
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        name: INITIAL_CAPACITY_ENV.to_string(),
                        value: capacity.clone(),
                    })?;
        }

        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{0}': {1}")]
    FileRead(String, String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid value '{value}' for {name}")]
    InvalidValue { name: String, value: String },
}
