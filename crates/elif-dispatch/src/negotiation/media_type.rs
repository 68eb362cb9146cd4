//! Media types and Accept header values

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur while parsing a media type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaTypeError {
    #[error("Empty media type")]
    Empty,
    #[error("Invalid media type syntax: {0}")]
    InvalidSyntax(String),
}

/// A `type/subtype` media type with optional parameters
///
/// Type and subtype are stored lowercase. Parameters are kept for display
/// but ignored by compatibility checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MediaType {
    main_type: String,
    sub_type: String,
    parameters: Vec<(String, String)>,
}

impl MediaType {
    pub fn new(main_type: &str, sub_type: &str) -> Self {
        Self {
            main_type: main_type.to_ascii_lowercase(),
            sub_type: sub_type.to_ascii_lowercase(),
            parameters: Vec::new(),
        }
    }

    /// `*/*`
    pub fn all() -> Self {
        Self::new("*", "*")
    }

    pub fn application_octet_stream() -> Self {
        Self::new("application", "octet-stream")
    }

    pub fn application_json() -> Self {
        Self::new("application", "json")
    }

    pub fn text_plain() -> Self {
        Self::new("text", "plain")
    }

    /// Parse `type/subtype;param=value`
    ///
    /// A bare `type` is read as `type/*`.
    pub fn parse(value: &str) -> Result<Self, MediaTypeError> {
        let mut parts = value.split(';');
        let essence = parts.next().unwrap_or_default().trim();
        if essence.is_empty() {
            return Err(MediaTypeError::Empty);
        }

        let (main_type, sub_type) = match essence.split_once('/') {
            Some((main, sub)) => (main.trim(), sub.trim()),
            None => (essence, "*"),
        };
        if main_type.is_empty() || sub_type.is_empty() || sub_type.contains('/') {
            return Err(MediaTypeError::InvalidSyntax(value.to_string()));
        }
        if main_type == "*" && sub_type != "*" {
            return Err(MediaTypeError::InvalidSyntax(value.to_string()));
        }

        let mut media_type = Self::new(main_type, sub_type);
        for param in parts {
            if let Some((key, val)) = param.trim().split_once('=') {
                media_type
                    .parameters
                    .push((key.trim().to_ascii_lowercase(), val.trim().to_string()));
            }
        }
        Ok(media_type)
    }

    pub fn main_type(&self) -> &str {
        &self.main_type
    }

    pub fn sub_type(&self) -> &str {
        &self.sub_type
    }

    pub fn parameters(&self) -> &[(String, String)] {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn is_wildcard_type(&self) -> bool {
        self.main_type == "*"
    }

    pub fn is_wildcard_subtype(&self) -> bool {
        self.sub_type == "*"
    }

    /// Neither type nor subtype is a wildcard
    pub fn is_concrete(&self) -> bool {
        !self.is_wildcard_type() && !self.is_wildcard_subtype()
    }

    /// 2 for `type/subtype`, 1 for `type/*`, 0 for `*/*`
    pub fn concreteness(&self) -> u8 {
        if self.is_wildcard_type() {
            0
        } else if self.is_wildcard_subtype() {
            1
        } else {
            2
        }
    }

    /// True when `self` covers `other`: `*/*` covers everything, `type/*` its subtypes
    pub fn includes(&self, other: &MediaType) -> bool {
        if self.is_wildcard_type() {
            return true;
        }
        self.main_type == other.main_type
            && (self.sub_type == other.sub_type || self.is_wildcard_subtype())
    }

    /// Either type includes the other
    pub fn is_compatible(&self, other: &MediaType) -> bool {
        self.includes(other) || other.includes(self)
    }

    /// Same type and subtype, parameters ignored
    pub fn same_essence(&self, other: &MediaType) -> bool {
        self.main_type == other.main_type && self.sub_type == other.sub_type
    }

    /// The more concrete of two compatible types, `a` on a tie
    pub fn most_specific<'a>(a: &'a MediaType, b: &'a MediaType) -> &'a MediaType {
        if b.concreteness() > a.concreteness() {
            b
        } else {
            a
        }
    }

    /// `type/subtype` without parameters
    pub fn essence(&self) -> String {
        format!("{}/{}", self.main_type, self.sub_type)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.main_type, self.sub_type)?;
        for (key, value) in &self.parameters {
            write!(f, "; {key}={value}")?;
        }
        Ok(())
    }
}

impl FromStr for MediaType {
    type Err = MediaTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MediaType::parse(s)
    }
}

impl TryFrom<String> for MediaType {
    type Error = MediaTypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        MediaType::parse(&value)
    }
}

impl From<MediaType> for String {
    fn from(media_type: MediaType) -> Self {
        media_type.to_string()
    }
}

/// One entry of an Accept header
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedMediaType {
    pub media_type: MediaType,
    pub quality: f32,
}

impl AcceptedMediaType {
    /// Parse an Accept header entry (e.g., `application/json;q=0.8`)
    ///
    /// A missing or unparsable quality counts as 1.0, out-of-range values are clamped.
    pub fn parse(value: &str) -> Option<Self> {
        let mut quality = 1.0;
        let mut kept = Vec::new();
        for (index, part) in value.split(';').enumerate() {
            if index > 0 {
                if let Some((key, val)) = part.split_once('=') {
                    if key.trim().eq_ignore_ascii_case("q") {
                        quality = val.trim().parse::<f32>().unwrap_or(1.0);
                        if quality.is_nan() {
                            quality = 1.0;
                        }
                        quality = quality.clamp(0.0, 1.0);
                        continue;
                    }
                }
            }
            kept.push(part);
        }

        let media_type = MediaType::parse(&kept.join(";")).ok()?;
        Some(Self {
            media_type,
            quality,
        })
    }

    /// Quality as an integer in thousandths
    pub fn quality_millis(&self) -> u16 {
        (self.quality * 1000.0).round() as u16
    }
}

/// The parsed Accept header: acceptable media types, most preferred first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AcceptedMediaTypes {
    entries: Vec<AcceptedMediaType>,
}

impl AcceptedMediaTypes {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Parse an Accept header
    ///
    /// Unparsable entries and entries with `q=0` are dropped. The rest are
    /// ordered by quality, then concreteness, keeping header order otherwise.
    pub fn parse(header: &str) -> Self {
        let mut entries: Vec<AcceptedMediaType> = header
            .split(',')
            .filter(|value| !value.trim().is_empty())
            .filter_map(|value| AcceptedMediaType::parse(value.trim()))
            .filter(|accepted| accepted.quality > 0.0)
            .collect();

        entries.sort_by(|a, b| {
            b.quality_millis()
                .cmp(&a.quality_millis())
                .then_with(|| b.media_type.concreteness().cmp(&a.media_type.concreteness()))
        });

        Self { entries }
    }

    /// Accepted types from a list, all with quality 1.0
    pub fn from_media_types(media_types: impl IntoIterator<Item = MediaType>) -> Self {
        Self {
            entries: media_types
                .into_iter()
                .map(|media_type| AcceptedMediaType {
                    media_type,
                    quality: 1.0,
                })
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AcceptedMediaType> {
        self.entries.iter()
    }

    /// The entries, or a single `*/*` when the header accepted nothing specific
    pub fn or_all(&self) -> Vec<AcceptedMediaType> {
        if self.entries.is_empty() {
            vec![AcceptedMediaType {
                media_type: MediaType::all(),
                quality: 1.0,
            }]
        } else {
            self.entries.clone()
        }
    }

    /// Media types in preference order
    pub fn media_types(&self) -> Vec<MediaType> {
        self.entries.iter().map(|e| e.media_type.clone()).collect()
    }
}
