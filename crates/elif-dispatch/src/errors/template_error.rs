//! Template diagnostics
//!
//! Malformed templates are never fatal. Each problem found while compiling
//! or matching a template is logged and kept as one of these values.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Empty pattern variables are not allowed: {pattern}")]
    EmptyVariable { pattern: String },

    #[error("Invalid character {character:?} in a pattern variable: {pattern}")]
    InvalidVariableCharacter { pattern: String, character: char },

    #[error("Closing brace outside of a pattern variable: {pattern}")]
    UnbalancedBrace { pattern: String },

    #[error("Unterminated pattern variable '{name}': {pattern}")]
    UnterminatedVariable { pattern: String, name: String },

    #[error("Template {pattern} failed to compile: {message}")]
    Compile { pattern: String, message: String },

    #[error("Matching against {pattern} was aborted: {message}")]
    MatchEngineFault { pattern: String, message: String },
}

impl TemplateError {
    /// The template the problem was found in
    pub fn pattern(&self) -> &str {
        match self {
            TemplateError::EmptyVariable { pattern }
            | TemplateError::InvalidVariableCharacter { pattern, .. }
            | TemplateError::UnbalancedBrace { pattern }
            | TemplateError::UnterminatedVariable { pattern, .. }
            | TemplateError::Compile { pattern, .. }
            | TemplateError::MatchEngineFault { pattern, .. } => pattern,
        }
    }
}
