//! URI template compilation and matching
//!
//! A [`Template`] is a pattern such as `/orders/{id}/items/{item}`. It is
//! compiled once, lazily, into an anchored regular expression where each
//! distinct variable becomes one capturing group. A variable repeated in the
//! same template is compiled to a back-reference, so both occurrences must
//! capture the same text.

use super::variable::{quote, Variable};
use crate::errors::TemplateError;
use crate::matching::MatchResult;
use once_cell::sync::OnceCell;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Backtracking budget applied to templates that need back-references
pub const DEFAULT_BACKTRACK_LIMIT: usize = 1_000_000;

/// How much of the input a template has to cover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchingMode {
    /// The whole input must match
    Equals,
    /// A prefix of the input must match
    StartsWith,
}

/// Compiled form of a template
#[derive(Debug)]
enum MatchEngine {
    /// Finite-automaton regex, used when the template has no repeated variable
    Linear(regex::Regex),
    /// Backtracking regex with a bounded budget, used for back-references
    Backtracking(fancy_regex::Regex),
}

#[derive(Debug)]
struct CompiledTemplate {
    source: String,
    engine: Option<MatchEngine>,
    regex_variables: Vec<String>,
    diagnostics: Vec<TemplateError>,
}

/// A URI template with variable descriptors
#[derive(Debug, Clone)]
pub struct Template {
    pattern: String,
    variables: HashMap<String, Variable>,
    default_variable: Variable,
    matching_mode: MatchingMode,
    encoding_variables: bool,
    backtrack_limit: usize,
    compiled: OnceCell<Arc<CompiledTemplate>>,
}

impl Template {
    /// Create a template matching the whole input with the default variable descriptor
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            variables: HashMap::new(),
            default_variable: Variable::default(),
            matching_mode: MatchingMode::Equals,
            encoding_variables: false,
            backtrack_limit: DEFAULT_BACKTRACK_LIMIT,
            compiled: OnceCell::new(),
        }
    }

    /// Set the matching mode
    pub fn with_mode(mut self, mode: MatchingMode) -> Self {
        self.matching_mode = mode;
        self.compiled = OnceCell::new();
        self
    }

    /// Describe a named variable
    pub fn with_variable(mut self, name: impl Into<String>, variable: Variable) -> Self {
        self.variables.insert(name.into(), variable);
        self.compiled = OnceCell::new();
        self
    }

    /// Descriptor used for variables without an explicit one
    pub fn with_default_variable(mut self, variable: Variable) -> Self {
        self.default_variable = variable;
        self.compiled = OnceCell::new();
        self
    }

    /// Percent-encode every resolved value when formatting
    pub fn with_encoding(mut self, encode: bool) -> Self {
        self.encoding_variables = encode;
        self
    }

    pub fn with_backtrack_limit(mut self, limit: usize) -> Self {
        self.backtrack_limit = limit;
        self.compiled = OnceCell::new();
        self
    }

    /// Replace the pattern, keeping descriptors and settings
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self.compiled = OnceCell::new();
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn matching_mode(&self) -> MatchingMode {
        self.matching_mode
    }

    pub fn variables(&self) -> &HashMap<String, Variable> {
        &self.variables
    }

    pub fn default_variable(&self) -> &Variable {
        &self.default_variable
    }

    pub fn encoding_variables(&self) -> bool {
        self.encoding_variables
    }

    /// Descriptor of a variable, falling back to the default one
    pub fn variable(&self, name: &str) -> &Variable {
        self.variables.get(name).unwrap_or(&self.default_variable)
    }

    /// Every variable name in the pattern, in order of appearance, repeats included
    pub fn variable_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        let mut current: Option<String> = None;
        for c in self.pattern.chars() {
            match current.as_mut() {
                None if c == '{' => current = Some(String::new()),
                Some(name) if c == '}' => {
                    if !name.is_empty() {
                        names.push(std::mem::take(name));
                    }
                    current = None;
                }
                Some(name) if is_variable_char(c) => name.push(c),
                _ => {}
            }
        }
        names
    }

    /// Distinct variable names in capture group order
    pub fn regex_variables(&self) -> Vec<String> {
        self.compiled().regex_variables.clone()
    }

    /// Number of literal characters outside placeholders
    pub fn literal_chars(&self) -> usize {
        let mut count = 0;
        let mut in_variable = false;
        for c in self.pattern.chars() {
            match c {
                '{' if !in_variable => in_variable = true,
                '}' if in_variable => in_variable = false,
                '}' => {}
                _ if !in_variable => count += 1,
                _ => {}
            }
        }
        count
    }

    /// Number of capturing groups in the compiled pattern
    pub fn capturing_groups(&self) -> usize {
        self.compiled().regex_variables.len()
    }

    /// Number of variables with a non-default descriptor
    pub fn explicit_variable_groups(&self) -> usize {
        self.compiled()
            .regex_variables
            .iter()
            .filter(|name| self.variables.contains_key(name.as_str()))
            .count()
    }

    /// The unanchored regular expression this template compiles to
    pub fn regex_source(&self) -> &str {
        &self.compiled().source
    }

    /// Problems found while compiling the pattern
    pub fn diagnostics(&self) -> &[TemplateError] {
        &self.compiled().diagnostics
    }

    /// Compile the pattern now rather than on first match
    pub fn compile(&self) -> &Self {
        self.compiled();
        self
    }

    /// Length of the matched prefix (or whole input), `None` when not matched
    pub fn match_len(&self, input: &str) -> Option<usize> {
        self.captures(input).map(|(len, _)| len)
    }

    /// Match `input` and bind each distinct variable to its raw captured text
    pub fn parse(&self, input: &str) -> Option<MatchResult> {
        let (matched_len, groups) = self.captures(input)?;
        let compiled = self.compiled();

        let mut bindings = HashMap::with_capacity(compiled.regex_variables.len());
        for (name, value) in compiled.regex_variables.iter().zip(groups) {
            trace!(variable = %name, value = %value, "Bound template variable");
            bindings.insert(name.clone(), value);
        }

        Some(MatchResult::new(
            matched_len,
            bindings,
            input[matched_len..].to_string(),
        ))
    }

    /// Like [`Template::parse`] but writes bindings into an existing map
    pub fn parse_into(&self, input: &str, bindings: &mut HashMap<String, String>) -> Option<usize> {
        let result = self.parse(input)?;
        let len = result.matched_len();
        bindings.extend(result.into_bindings());
        Some(len)
    }

    /// Substitute each placeholder with the resolver's value
    ///
    /// Unresolved variables fall back to their descriptor's default value.
    /// Values are percent-encoded when the template or the variable asks for it.
    pub fn format<F>(&self, resolver: F) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut output = String::with_capacity(self.pattern.len());
        let mut name: Option<String> = None;

        for c in self.pattern.chars() {
            match name.as_mut() {
                Some(current) if c == '}' => {
                    if current.is_empty() {
                        warn!(pattern = %self.pattern, "Empty pattern variables are not allowed");
                    } else {
                        let variable = self.variable(current);
                        let value = resolver(current).unwrap_or_else(|| variable.default_value.clone());
                        if self.encoding_variables || variable.encode_on_format {
                            output.extend(utf8_percent_encode(&value, NON_ALPHANUMERIC));
                        } else {
                            output.push_str(&value);
                        }
                    }
                    name = None;
                }
                Some(current) if is_variable_char(c) => current.push(c),
                Some(_) => {
                    warn!(pattern = %self.pattern, character = %c, "Invalid character detected in pattern variable");
                }
                None if c == '{' => name = Some(String::new()),
                None if c == '}' => {
                    warn!(pattern = %self.pattern, "Closing brace outside of a pattern variable");
                }
                None => output.push(c),
            }
        }

        output
    }

    /// Format using a map of values
    pub fn format_map(&self, values: &HashMap<String, String>) -> String {
        self.format(|name| values.get(name).cloned())
    }

    fn compiled(&self) -> &CompiledTemplate {
        self.compiled.get_or_init(|| Arc::new(self.build()))
    }

    fn captures(&self, input: &str) -> Option<(usize, Vec<String>)> {
        let compiled = self.compiled();
        let engine = compiled.engine.as_ref()?;
        let groups = compiled.regex_variables.len();

        match engine {
            MatchEngine::Linear(regex) => {
                let caps = regex.captures(input)?;
                let len = caps.get(0).map(|m| m.end())?;
                let values = (1..=groups)
                    .map(|i| caps.get(i).map(|m| m.as_str().to_string()).unwrap_or_default())
                    .collect();
                Some((len, values))
            }
            MatchEngine::Backtracking(regex) => match regex.captures(input) {
                Ok(Some(caps)) => {
                    let len = caps.get(0).map(|m| m.end())?;
                    let values = (1..=groups)
                        .map(|i| caps.get(i).map(|m| m.as_str().to_string()).unwrap_or_default())
                        .collect();
                    Some((len, values))
                }
                Ok(None) => None,
                Err(e) => {
                    let fault = TemplateError::MatchEngineFault {
                        pattern: self.pattern.clone(),
                        message: e.to_string(),
                    };
                    warn!(error = %fault, "Template match aborted, treating as no match");
                    None
                }
            },
        }
    }

    fn build(&self) -> CompiledTemplate {
        let mut source = String::new();
        let mut regex_variables: Vec<String> = Vec::new();
        let mut diagnostics = Vec::new();
        let mut uses_backrefs = false;
        let mut name: Option<String> = None;

        for c in self.pattern.chars() {
            match name.as_mut() {
                Some(current) if c == '}' => {
                    if current.is_empty() {
                        diagnostics.push(TemplateError::EmptyVariable {
                            pattern: self.pattern.clone(),
                        });
                    } else if let Some(index) = regex_variables.iter().position(|v| *v == *current) {
                        source.push_str(&format!(r"(?:\{})", index + 1));
                        uses_backrefs = true;
                    } else {
                        source.push_str(&self.variable(current).regex());
                        regex_variables.push(std::mem::take(current));
                    }
                    name = None;
                }
                Some(current) if is_variable_char(c) => current.push(c),
                Some(_) => diagnostics.push(TemplateError::InvalidVariableCharacter {
                    pattern: self.pattern.clone(),
                    character: c,
                }),
                None if c == '{' => name = Some(String::new()),
                None if c == '}' => diagnostics.push(TemplateError::UnbalancedBrace {
                    pattern: self.pattern.clone(),
                }),
                None => source.push_str(&quote(c.encode_utf8(&mut [0; 4]))),
            }
        }

        if let Some(unterminated) = name {
            diagnostics.push(TemplateError::UnterminatedVariable {
                pattern: self.pattern.clone(),
                name: unterminated,
            });
        }

        let anchored = match self.matching_mode {
            MatchingMode::Equals => format!("^(?:{source})$"),
            MatchingMode::StartsWith => format!("^(?:{source})"),
        };

        let engine = if uses_backrefs {
            fancy_regex::RegexBuilder::new(&anchored)
                .backtrack_limit(self.backtrack_limit)
                .build()
                .map(MatchEngine::Backtracking)
                .map_err(|e| e.to_string())
        } else {
            regex::Regex::new(&anchored)
                .map(MatchEngine::Linear)
                .map_err(|e| e.to_string())
        };

        let engine = match engine {
            Ok(engine) => Some(engine),
            Err(message) => {
                diagnostics.push(TemplateError::Compile {
                    pattern: self.pattern.clone(),
                    message,
                });
                None
            }
        };

        for diagnostic in &diagnostics {
            warn!(error = %diagnostic, "Malformed URI template");
        }
        debug!(pattern = %self.pattern, regex = %anchored, "Compiled URI template");

        CompiledTemplate {
            source,
            engine,
            regex_variables,
            diagnostics,
        }
    }
}

impl From<&str> for Template {
    fn from(pattern: &str) -> Self {
        Template::new(pattern)
    }
}

impl From<String> for Template {
    fn from(pattern: String) -> Self {
        Template::new(pattern)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

/// Characters allowed in a variable name (RFC 3986 unreserved)
fn is_variable_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~')
}
