//! Dispatcher configuration

pub mod defaults;
pub mod dispatch_config;
pub mod validation;

pub use defaults::DispatchDefaults;
pub use dispatch_config::DispatchConfig;
pub use validation::{AppConfigTrait, ConfigError, ConfigResult, ConfigSource};
