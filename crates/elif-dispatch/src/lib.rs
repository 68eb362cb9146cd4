//! # elif-dispatch
//!
//! Resource dispatcher for the elif.rs LLM-friendly web framework.
//!
//! This crate resolves an incoming request to a resource method with:
//! - URI templates with typed variables, compiled once to regular expressions
//! - Specificity ranking between competing templates
//! - A tree of root resources, sub-resource methods and sub-resource locators
//! - Three-phase dispatching (root resource, sub-resources, method)
//! - Content negotiation between produced types and the Accept header

// Core modules
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod logging;
pub mod matching;
pub mod negotiation;
pub mod resource;
pub mod template;

// Main dispatch API
pub use dispatch::{DispatchOutcome, DispatchRequest, DispatchSummary, Dispatched, Dispatcher};
pub use errors::{DispatchError, DispatchResult, TemplateError};

// Re-export configuration
pub use config::{AppConfigTrait, ConfigError, ConfigResult, ConfigSource, DispatchConfig, DispatchDefaults};
pub use logging::{init_logging, LoggingConfig};

// Re-export template types
pub use template::{normalize_path, MatchingMode, Template, Variable, VariableType};

// Re-export matching types
pub use matching::{MatchResult, PathBindings, RemainingPath, Specificity};

// Re-export resource types
pub use resource::{
    HttpMethod, LocatorError, ResourceMethod, ResourceNode, ResourceTree, RouteDescription, RouteKind,
    SubResourceLocator,
};

// Re-export negotiation types
pub use negotiation::{AcceptedMediaType, AcceptedMediaTypes, ContentNegotiator, MediaType, ProducibleTypes};
