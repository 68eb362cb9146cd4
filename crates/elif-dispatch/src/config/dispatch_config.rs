//! Dispatcher configuration
//!
//! Controls how templates are compiled and how request paths are prepared
//! before matching.

use super::defaults::DispatchDefaults;
use super::validation::{AppConfigTrait, ConfigError, ConfigResult, ConfigSource};
use crate::negotiation::MediaType;
use crate::template::{Template, Variable, VariableType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;

const ENV_DEFAULT_VARIABLE_TYPE: &str = "DISPATCH_DEFAULT_VARIABLE_TYPE";
const ENV_BACKTRACK_LIMIT: &str = "DISPATCH_BACKTRACK_LIMIT";
const ENV_STRIP_MATRIX_PARAMS: &str = "DISPATCH_STRIP_MATRIX_PARAMS";
const ENV_FALLBACK_MEDIA_TYPE: &str = "DISPATCH_FALLBACK_MEDIA_TYPE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Character class of variables without an explicit descriptor
    pub default_variable_type: VariableType,
    /// Backtracking budget for templates with repeated variables
    pub backtrack_limit: usize,
    /// Drop `;key=value` matrix parameters from path segments before matching
    pub strip_matrix_params: bool,
    /// Response type used when negotiation only finds `*/*` or `application/*`
    pub fallback_media_type: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            default_variable_type: DispatchDefaults::DEFAULT_VARIABLE_TYPE,
            backtrack_limit: DispatchDefaults::BACKTRACK_LIMIT,
            strip_matrix_params: DispatchDefaults::STRIP_MATRIX_PARAMS,
            fallback_media_type: DispatchDefaults::FALLBACK_MEDIA_TYPE.to_string(),
        }
    }
}

impl AppConfigTrait for DispatchConfig {
    fn from_env() -> ConfigResult<Self> {
        let default_variable_type = get_env_or_default(
            ENV_DEFAULT_VARIABLE_TYPE,
            DispatchDefaults::DEFAULT_VARIABLE_TYPE.as_str(),
        )
        .parse::<VariableType>()
        .map_err(|_| {
            ConfigError::invalid_value(
                "default_variable_type",
                env::var(ENV_DEFAULT_VARIABLE_TYPE).unwrap_or_default(),
                "a variable type such as uri_segment, uri_path or digit",
            )
        })?;

        let backtrack_limit = get_env_or_default(
            ENV_BACKTRACK_LIMIT,
            &DispatchDefaults::BACKTRACK_LIMIT.to_string(),
        )
        .parse::<usize>()
        .map_err(|_| {
            ConfigError::invalid_value(
                "backtrack_limit",
                env::var(ENV_BACKTRACK_LIMIT).unwrap_or_default(),
                "a positive number of steps",
            )
        })?;

        let strip_matrix_params = get_env_or_default(
            ENV_STRIP_MATRIX_PARAMS,
            &DispatchDefaults::STRIP_MATRIX_PARAMS.to_string(),
        )
        .parse::<bool>()
        .map_err(|_| {
            ConfigError::invalid_value(
                "strip_matrix_params",
                env::var(ENV_STRIP_MATRIX_PARAMS).unwrap_or_default(),
                "true or false",
            )
        })?;

        let fallback_media_type =
            get_env_or_default(ENV_FALLBACK_MEDIA_TYPE, DispatchDefaults::FALLBACK_MEDIA_TYPE);

        let config = DispatchConfig {
            default_variable_type,
            backtrack_limit,
            strip_matrix_params,
            fallback_media_type,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.backtrack_limit == 0 {
            return Err(ConfigError::validation_failed(
                "Backtrack limit must be greater than 0",
            ));
        }

        let fallback = self.fallback_media_type()?;
        if !fallback.is_concrete() {
            return Err(ConfigError::invalid_value(
                "fallback_media_type",
                self.fallback_media_type.clone(),
                "a concrete type/subtype media type",
            ));
        }

        Ok(())
    }

    fn config_sources(&self) -> HashMap<String, ConfigSource> {
        [
            ("default_variable_type", ENV_DEFAULT_VARIABLE_TYPE),
            ("backtrack_limit", ENV_BACKTRACK_LIMIT),
            ("strip_matrix_params", ENV_STRIP_MATRIX_PARAMS),
            ("fallback_media_type", ENV_FALLBACK_MEDIA_TYPE),
        ]
        .into_iter()
        .map(|(field, var)| {
            let source = if env::var(var).is_ok() {
                ConfigSource::EnvVar(var.to_string())
            } else {
                ConfigSource::Default(field.to_string())
            };
            (field.to_string(), source)
        })
        .collect()
    }
}

impl DispatchConfig {
    /// The parsed fallback media type
    pub fn fallback_media_type(&self) -> ConfigResult<MediaType> {
        self.fallback_media_type.parse().map_err(|_| {
            ConfigError::invalid_value(
                "fallback_media_type",
                self.fallback_media_type.clone(),
                "a type/subtype media type",
            )
        })
    }

    /// Descriptor used for variables without an explicit one
    pub fn default_variable(&self) -> Variable {
        Variable::new(self.default_variable_type)
    }

    /// A template carrying this configuration's defaults
    pub fn template(&self, pattern: &str) -> Template {
        Template::new(pattern)
            .with_default_variable(self.default_variable())
            .with_backtrack_limit(self.backtrack_limit)
    }
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
