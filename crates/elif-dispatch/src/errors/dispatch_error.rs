//! Dispatch error types
//!
//! Every request-time failure of the dispatcher maps onto one HTTP status.

use crate::negotiation::MediaType;
use crate::resource::HttpMethod;
use std::collections::BTreeSet;
use thiserror::Error;

/// Result type for dispatch operations
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Request dispatching errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Resource not found: {path}")]
    NotFound { path: String },

    #[error("Method {method} not allowed, allowed methods: {}", join(.allowed))]
    MethodNotAllowed {
        method: HttpMethod,
        allowed: BTreeSet<HttpMethod>,
    },

    #[error("Unsupported media type: {}", describe(.media_type))]
    UnsupportedMediaType { media_type: Option<MediaType> },

    #[error("Not acceptable: no producible media type matches [{}]", join(.accepted))]
    NotAcceptable { accepted: Vec<MediaType> },

    #[error("Sub-resource locator {locator} failed: {message}")]
    LocatorFailed { locator: String, message: String },
}

fn join<'a, T: std::fmt::Display + 'a>(items: impl IntoIterator<Item = &'a T>) -> String {
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe(media_type: &Option<MediaType>) -> String {
    match media_type {
        Some(media_type) => media_type.to_string(),
        None => "none".to_string(),
    }
}

impl DispatchError {
    /// Create a not found error
    pub fn not_found<T: Into<String>>(path: T) -> Self {
        DispatchError::NotFound { path: path.into() }
    }

    /// Create a method not allowed error
    pub fn method_not_allowed(method: HttpMethod, allowed: BTreeSet<HttpMethod>) -> Self {
        DispatchError::MethodNotAllowed { method, allowed }
    }

    /// Create an unsupported media type error
    pub fn unsupported_media_type(media_type: Option<MediaType>) -> Self {
        DispatchError::UnsupportedMediaType { media_type }
    }

    /// Create a not acceptable error
    pub fn not_acceptable(accepted: Vec<MediaType>) -> Self {
        DispatchError::NotAcceptable { accepted }
    }

    /// Create a locator failure
    pub fn locator_failed<L: Into<String>, M: Into<String>>(locator: L, message: M) -> Self {
        DispatchError::LocatorFailed {
            locator: locator.into(),
            message: message.into(),
        }
    }

    /// Get error code for consistent API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            DispatchError::NotFound { .. } => "RESOURCE_NOT_FOUND",
            DispatchError::MethodNotAllowed { .. } => "METHOD_NOT_ALLOWED",
            DispatchError::UnsupportedMediaType { .. } => "UNSUPPORTED_MEDIA_TYPE",
            DispatchError::NotAcceptable { .. } => "NOT_ACCEPTABLE",
            DispatchError::LocatorFailed { .. } => "LOCATOR_FAILED",
        }
    }

    /// Methods to advertise in an `Allow` header, if any
    pub fn allowed_methods(&self) -> Option<&BTreeSet<HttpMethod>> {
        match self {
            DispatchError::MethodNotAllowed { allowed, .. } => Some(allowed),
            _ => None,
        }
    }
}
