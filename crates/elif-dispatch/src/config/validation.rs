//! Configuration errors and source tracking

use std::collections::HashMap;
use thiserror::Error;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for field '{field}': '{value}'. Expected: {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },

    #[error("Configuration validation failed: {message}")]
    ValidationFailed { message: String },
}

impl ConfigError {
    /// Create an invalid value error
    pub fn invalid_value<F, V, E>(field: F, value: V, expected: E) -> Self
    where
        F: Into<String>,
        V: Into<String>,
        E: Into<String>,
    {
        ConfigError::InvalidValue {
            field: field.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }

    /// Create a validation failed error
    pub fn validation_failed<T: Into<String>>(message: T) -> Self {
        ConfigError::ValidationFailed {
            message: message.into(),
        }
    }
}

/// Where a configuration value came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Value loaded from environment variable
    EnvVar(String),
    /// Default value used
    Default(String),
}

/// Configuration loaded from the environment
pub trait AppConfigTrait: Sized {
    /// Load configuration from environment variables
    fn from_env() -> ConfigResult<Self>;

    /// Validate the configuration
    fn validate(&self) -> ConfigResult<()>;

    /// Get configuration source information for debugging
    fn config_sources(&self) -> HashMap<String, ConfigSource>;
}
