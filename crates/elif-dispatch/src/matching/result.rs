//! Match results and accumulated path bindings

use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised when reading a bound variable
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    #[error("Missing path variable: {0}")]
    Missing(String),
    #[error("Invalid value for path variable '{name}': {message}")]
    InvalidFormat { name: String, message: String },
}

/// Outcome of a successful template match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    matched_len: usize,
    bindings: HashMap<String, String>,
    remainder: String,
}

impl MatchResult {
    pub fn new(matched_len: usize, bindings: HashMap<String, String>, remainder: String) -> Self {
        Self {
            matched_len,
            bindings,
            remainder,
        }
    }

    /// Number of input characters (bytes) consumed by the match
    pub fn matched_len(&self) -> usize {
        self.matched_len
    }

    pub fn bindings(&self) -> &HashMap<String, String> {
        &self.bindings
    }

    pub fn binding(&self, name: &str) -> Option<&str> {
        self.bindings.get(name).map(String::as_str)
    }

    /// Unmatched tail of the input
    pub fn remainder(&self) -> &str {
        &self.remainder
    }

    /// True when nothing is left, or only a single `/`
    pub fn remainder_is_empty_or_slash(&self) -> bool {
        self.remainder.is_empty() || self.remainder == "/"
    }

    pub fn into_bindings(self) -> HashMap<String, String> {
        self.bindings
    }
}

/// Path variables bound across every hop of a dispatch
///
/// Bindings from a later hop replace earlier bindings of the same name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PathBindings {
    values: HashMap<String, String>,
}

impl PathBindings {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Get a raw (undecoded) variable value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Get a variable parsed as `T`
    pub fn get_typed<T>(&self, name: &str) -> Result<T, BindingError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        let value = self
            .get(name)
            .ok_or_else(|| BindingError::Missing(name.to_string()))?;
        value.parse::<T>().map_err(|e| BindingError::InvalidFormat {
            name: name.to_string(),
            message: e.to_string(),
        })
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Merge the bindings of a match, overriding existing names
    pub fn merge(&mut self, result: &MatchResult) {
        for (name, value) in result.bindings() {
            self.values.insert(name.clone(), value.clone());
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn as_map(&self) -> &HashMap<String, String> {
        &self.values
    }

    pub fn into_map(self) -> HashMap<String, String> {
        self.values
    }
}

impl From<HashMap<String, String>> for PathBindings {
    fn from(values: HashMap<String, String>) -> Self {
        Self { values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(pairs: &[(&str, &str)], remainder: &str) -> MatchResult {
        let bindings = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        MatchResult::new(3, bindings, remainder.to_string())
    }

    #[test]
    fn test_remainder_empty_or_slash() {
        assert!(result(&[], "").remainder_is_empty_or_slash());
        assert!(result(&[], "/").remainder_is_empty_or_slash());
        assert!(!result(&[], "/x").remainder_is_empty_or_slash());
    }

    #[test]
    fn test_later_bindings_override() {
        let mut bindings = PathBindings::new();
        bindings.merge(&result(&[("id", "1"), ("a", "x")], ""));
        bindings.merge(&result(&[("id", "2")], ""));
        assert_eq!(bindings.get("id"), Some("2"));
        assert_eq!(bindings.get("a"), Some("x"));
        assert_eq!(bindings.len(), 2);
    }

    #[test]
    fn test_get_typed() {
        let mut bindings = PathBindings::new();
        bindings.insert("id", "42");
        bindings.insert("name", "abc");

        assert_eq!(bindings.get_typed::<u32>("id").unwrap(), 42);
        assert!(matches!(
            bindings.get_typed::<u32>("name"),
            Err(BindingError::InvalidFormat { .. })
        ));
        assert_eq!(
            bindings.get_typed::<u32>("missing"),
            Err(BindingError::Missing("missing".to_string()))
        );
    }
}
