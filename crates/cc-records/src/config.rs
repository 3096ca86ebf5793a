//! Workflow configuration from environment variables or a JSON file.

use crate::domain::{DuplicatePolicy, QueryDisclosure, TransitionPolicy};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Organization whose members hold the `Validator` capability by default.
pub const DEFAULT_VALIDATOR_ORG: &str = "Org1MSP";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable held an unknown value.
    #[error("invalid value {value:?} for {name}")]
    InvalidValue {
        /// Variable or field name.
        name: &'static str,
        /// Rejected value.
        value: String,
    },

    /// The validator organization is empty.
    #[error("validator_org must not be empty")]
    EmptyValidatorOrg,

    /// The config file could not be read.
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid JSON for this schema.
    #[error("cannot parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Policies of the record workflow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Members of this organization hold the `Validator` capability.
    pub validator_org: String,

    /// Which status transitions validators may perform.
    pub transition_policy: TransitionPolicy,

    /// Whether queries distinguish "not found" from "not approved".
    pub query_errors: QueryDisclosure,

    /// Behaviour of create on an occupied key.
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            validator_org: DEFAULT_VALIDATOR_ORG.to_string(),
            transition_policy: TransitionPolicy::default(),
            query_errors: QueryDisclosure::default(),
            duplicate_policy: DuplicatePolicy::default(),
        }
    }
}

impl WorkflowConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CC_VALIDATOR_ORG`: validator organization (default: Org1MSP)
    /// - `CC_TRANSITION_POLICY`: `strict` or `permissive` (default: strict)
    /// - `CC_QUERY_ERRORS`: `distinct` or `collapsed` (default: distinct)
    /// - `CC_DUPLICATE_POLICY`: `overwrite` or `reject` (default: overwrite)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            validator_org: lookup("CC_VALIDATOR_ORG").unwrap_or(defaults.validator_org),
            transition_policy: parse_var(&lookup, "CC_TRANSITION_POLICY")?
                .unwrap_or(defaults.transition_policy),
            query_errors: parse_var(&lookup, "CC_QUERY_ERRORS")?.unwrap_or(defaults.query_errors),
            duplicate_policy: parse_var(&lookup, "CC_DUPLICATE_POLICY")?
                .unwrap_or(defaults.duplicate_policy),
        };
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let bytes = std::fs::read(path)?;
        let config: Self = serde_json::from_slice(&bytes)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject unusable settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.validator_org.trim().is_empty() {
            return Err(ConfigError::EmptyValidatorOrg);
        }
        Ok(())
    }
}

fn parse_var<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { name, value }),
    }
}
