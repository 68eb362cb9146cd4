//! URI template engine
//!
//! This module provides:
//! - Variable descriptors with typed character classes
//! - Template compilation to anchored regular expressions
//! - Prefix and full matching with variable binding
//! - Formatting templates back into URIs

pub mod variable;
pub mod pattern;

pub use variable::{Variable, VariableType, UnknownVariableType};
pub use pattern::{Template, MatchingMode, DEFAULT_BACKTRACK_LIMIT};

/// Normalize a resource path template
///
/// A leading `/` is added when missing and a single trailing `/` is removed,
/// so `orders/`, `/orders/` and `/orders` all denote the same resource.
/// The root templates `""` and `"/"` normalize to `""`.
pub fn normalize_path(pattern: &str) -> String {
    let trimmed = pattern.trim();
    let without_trailing = trimmed.strip_suffix('/').unwrap_or(trimmed);
    if without_trailing.is_empty() {
        return String::new();
    }
    if without_trailing.starts_with('/') {
        without_trailing.to_string()
    } else {
        format!("/{without_trailing}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(""), "");
        assert_eq!(normalize_path("/"), "");
        assert_eq!(normalize_path("orders"), "/orders");
        assert_eq!(normalize_path("/orders/"), "/orders");
        assert_eq!(normalize_path("orders/{id}/"), "/orders/{id}");
        assert_eq!(normalize_path("/orders/{id}"), "/orders/{id}");
    }
}
