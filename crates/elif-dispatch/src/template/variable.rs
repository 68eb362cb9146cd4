//! Template variable descriptors
//!
//! A [`Variable`] describes what a `{name}` placeholder in a URI template may
//! capture: its character class, whether it is required, an optional default
//! value and whether the value is fixed to that default.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const ALPHA: &str = "a-zA-Z";
const DIGIT: &str = "0-9";
const HEXA: &str = "0-9A-Fa-f";
const UNRESERVED: &str = r"a-zA-Z0-9\-._~";
const SUB_DELIMS: &str = "!$&'()*+,;=";
const GEN_DELIMS: &str = r":/?#\[\]@";

/// Unknown variable type name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown variable type: {0}")]
pub struct UnknownVariableType(pub String);

/// Character classes a template variable can capture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableType {
    /// Any character
    All,
    /// ASCII letters
    Alpha,
    /// ASCII digits
    Digit,
    /// ASCII letters and digits
    AlphaDigit,
    /// RFC 3986 unreserved characters
    UriUnreserved,
    /// Word characters (letters, digits and underscore)
    Word,
    /// A single path segment (no `/`)
    UriSegment,
    /// A path, slashes included
    UriPath,
    /// A query component
    UriQuery,
    /// A fragment component
    UriFragment,
    /// Any reserved or unreserved URI character
    UriAll,
}

impl VariableType {
    /// All known variable types
    pub const ALL: [VariableType; 11] = [
        VariableType::All,
        VariableType::Alpha,
        VariableType::Digit,
        VariableType::AlphaDigit,
        VariableType::UriUnreserved,
        VariableType::Word,
        VariableType::UriSegment,
        VariableType::UriPath,
        VariableType::UriQuery,
        VariableType::UriFragment,
        VariableType::UriAll,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VariableType::All => "all",
            VariableType::Alpha => "alpha",
            VariableType::Digit => "digit",
            VariableType::AlphaDigit => "alpha_digit",
            VariableType::UriUnreserved => "uri_unreserved",
            VariableType::Word => "word",
            VariableType::UriSegment => "uri_segment",
            VariableType::UriPath => "uri_path",
            VariableType::UriQuery => "uri_query",
            VariableType::UriFragment => "uri_fragment",
            VariableType::UriAll => "uri_all",
        }
    }

    /// Regex alternatives for the URI grammar types, `None` for plain classes
    fn grammar(&self) -> Option<String> {
        let pct = format!("%[{HEXA}][{HEXA}]");
        let pchar = format!("[{UNRESERVED}{SUB_DELIMS}:@]|(?:{pct})");
        match self {
            VariableType::UriSegment => Some(pchar),
            VariableType::UriPath => Some(format!("{pchar}|/")),
            VariableType::UriQuery | VariableType::UriFragment => Some(format!(r"{pchar}|/|\?")),
            VariableType::UriAll => Some(format!("[{GEN_DELIMS}{SUB_DELIMS}{UNRESERVED}]|(?:{pct})")),
            _ => None,
        }
    }

    /// Bracket expression body for the plain character-class types
    fn class(&self) -> Option<&'static str> {
        match self {
            VariableType::Alpha => Some(ALPHA),
            VariableType::Digit => Some(DIGIT),
            VariableType::AlphaDigit => Some("a-zA-Z0-9"),
            VariableType::UriUnreserved => Some(UNRESERVED),
            VariableType::Word => Some("a-zA-Z0-9_"),
            _ => None,
        }
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VariableType {
    type Err = UnknownVariableType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        VariableType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| UnknownVariableType(s.to_string()))
    }
}

/// Descriptor of a template placeholder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub var_type: VariableType,
    pub default_value: String,
    pub required: bool,
    pub fixed: bool,
    pub encode_on_format: bool,
}

impl Variable {
    /// A required variable of the given type with no default value
    pub fn new(var_type: VariableType) -> Self {
        Self {
            var_type,
            default_value: String::new(),
            required: true,
            fixed: false,
            encode_on_format: false,
        }
    }

    /// A variable that only ever matches `value` literally
    pub fn fixed(value: impl Into<String>) -> Self {
        Self {
            var_type: VariableType::All,
            default_value: value.into(),
            required: true,
            fixed: true,
            encode_on_format: false,
        }
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = value.into();
        self
    }

    /// Allow the variable to capture an empty string
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn encoded(mut self) -> Self {
        self.encode_on_format = true;
        self
    }

    /// Regex fragment capturing this variable as a single group
    pub fn regex(&self) -> String {
        if self.fixed {
            return format!("({})", quote(&self.default_value));
        }

        let repeat = if self.required { '+' } else { '*' };
        if let Some(grammar) = self.var_type.grammar() {
            return format!("((?:{grammar}){repeat})");
        }

        match self.var_type.class() {
            Some(class) => format!("([{class}]{repeat})"),
            None => format!("(.{repeat})"),
        }
    }
}

impl Default for Variable {
    fn default() -> Self {
        Variable::new(VariableType::UriSegment)
    }
}

/// Escape regex metacharacters so `text` is matched literally
pub(crate) fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(
            c,
            '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$' | '-'
        ) {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted
}
