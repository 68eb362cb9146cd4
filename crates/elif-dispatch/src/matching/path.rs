//! Remaining request path and segment-aware resource matching

use super::result::MatchResult;
use crate::template::Template;
use std::fmt;

/// The part of a request path not yet consumed by resource matching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemainingPath {
    path: String,
}

impl RemainingPath {
    /// Wrap a request path, optionally dropping `;key=value` matrix parameters
    pub fn new(path: &str, strip_matrix_params: bool) -> Self {
        let path = if strip_matrix_params && path.contains(';') {
            path.split('/')
                .map(|segment| segment.split(';').next().unwrap_or_default())
                .collect::<Vec<_>>()
                .join("/")
        } else {
            path.to_string()
        };
        Self { path }
    }

    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// True when nothing is left, or only a single `/`
    pub fn is_empty_or_slash(&self) -> bool {
        self.path.is_empty() || self.path == "/"
    }
}

impl From<&str> for RemainingPath {
    fn from(path: &str) -> Self {
        RemainingPath::new(path, false)
    }
}

impl fmt::Display for RemainingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Match a resource template against a prefix of the remaining path
///
/// The prefix must end on a segment boundary: either the whole path was
/// consumed, the rest starts with `/`, or the matched part ends with `/`.
pub fn match_resource(template: &Template, remaining: &RemainingPath) -> Option<MatchResult> {
    let path = remaining.as_str();
    let result = template.parse(path)?;
    let (matched, rest) = path.split_at(result.matched_len());

    if rest.is_empty() || rest.starts_with('/') {
        return Some(result);
    }
    if matched.ends_with('/') {
        let len = result.matched_len();
        return Some(MatchResult::new(
            len,
            result.into_bindings(),
            format!("/{rest}"),
        ));
    }
    None
}
