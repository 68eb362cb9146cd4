//! Response media type selection

use super::media_type::{AcceptedMediaTypes, MediaType};
use crate::errors::{DispatchError, DispatchResult};
use crate::resource::ResourceMethod;
use tracing::debug;

/// Source of producible media types for methods that declare none
///
/// Implementations typically look at the registered entity writers for the
/// method's return type.
pub trait ProducibleTypes: Send + Sync {
    fn producible_media_types(&self, method: &ResourceMethod) -> Vec<MediaType>;
}

/// No inference: undeclared methods can produce anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInference;

impl ProducibleTypes for NoInference {
    fn producible_media_types(&self, _method: &ResourceMethod) -> Vec<MediaType> {
        Vec::new()
    }
}

/// Picks the response media type from what a method produces and what the client accepts
#[derive(Debug, Clone)]
pub struct ContentNegotiator {
    fallback: MediaType,
}

impl ContentNegotiator {
    pub fn new() -> Self {
        Self {
            fallback: MediaType::application_octet_stream(),
        }
    }

    /// Use `fallback` when only wildcard types remain
    pub fn with_fallback(fallback: MediaType) -> Self {
        Self { fallback }
    }

    pub fn fallback(&self) -> &MediaType {
        &self.fallback
    }

    /// Determine the response media type
    ///
    /// A forced type always wins. Otherwise every accepted type, most
    /// preferred first, is paired with every producible type, most concrete
    /// first, and the more specific of each compatible pair is collected.
    /// The first concrete type collected is the answer. If only wildcards
    /// were collected, `*/*` or `application/*` resolve to the fallback.
    pub fn determine(
        &self,
        forced: Option<&MediaType>,
        produces: &[MediaType],
        accepted: &AcceptedMediaTypes,
    ) -> DispatchResult<MediaType> {
        if let Some(forced) = forced {
            return Ok(forced.clone());
        }

        let mut producible: Vec<MediaType> = if produces.is_empty() {
            vec![MediaType::all()]
        } else {
            produces.to_vec()
        };
        producible.sort_by(|a, b| b.concreteness().cmp(&a.concreteness()));

        let mut candidates: Vec<MediaType> = Vec::new();
        for accepted in accepted.or_all() {
            for produced in &producible {
                if accepted.media_type.is_compatible(produced) {
                    candidates.push(MediaType::most_specific(produced, &accepted.media_type).clone());
                }
            }
        }

        if candidates.is_empty() {
            debug!(produces = ?producible, "No producible type is acceptable");
            return Err(DispatchError::not_acceptable(accepted.media_types()));
        }

        if let Some(concrete) = candidates.iter().find(|m| m.is_concrete()) {
            return Ok(concrete.clone());
        }

        let application_any = MediaType::new("application", "*");
        if candidates
            .iter()
            .any(|m| m.same_essence(&MediaType::all()) || m.same_essence(&application_any))
        {
            return Ok(self.fallback.clone());
        }

        Err(DispatchError::not_acceptable(accepted.media_types()))
    }

    /// True when the method can produce something the client accepts
    ///
    /// Methods without declared types and requests without Accept entries always pass.
    pub fn is_acceptable(produces: &[MediaType], accepted: &AcceptedMediaTypes) -> bool {
        if produces.is_empty() || accepted.is_empty() {
            return true;
        }
        accepted
            .iter()
            .any(|a| produces.iter().any(|p| a.media_type.is_compatible(p)))
    }
}

impl Default for ContentNegotiator {
    fn default() -> Self {
        Self::new()
    }
}
