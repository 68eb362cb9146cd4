//! Dispatch outcomes

use crate::matching::PathBindings;
use crate::negotiation::MediaType;
use crate::resource::{HttpMethod, ResourceMethod, ResourceNode};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

/// A request resolved to a method
#[derive(Debug, Clone)]
pub struct Dispatched {
    /// The resource instance that owns the method
    pub resource: Arc<ResourceNode>,
    pub method: Arc<ResourceMethod>,
    /// Variables bound along the way, later hops overriding earlier ones
    pub bindings: PathBindings,
    pub media_type: MediaType,
    /// Matched path prefixes, most recent first
    pub matched_uris: Vec<String>,
}

impl Dispatched {
    pub fn binding(&self, name: &str) -> Option<&str> {
        self.bindings.get(name)
    }

    /// Serializable summary for logs and introspection
    pub fn summary(&self) -> DispatchSummary {
        DispatchSummary {
            resource: self.resource.name().to_string(),
            method: self.method.id().to_string(),
            verb: self.method.http_method().clone(),
            bindings: self.bindings.clone(),
            media_type: self.media_type.clone(),
            matched_uris: self.matched_uris.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchSummary {
    pub resource: String,
    pub method: String,
    pub verb: HttpMethod,
    pub bindings: PathBindings,
    pub media_type: MediaType,
    pub matched_uris: Vec<String>,
}

/// Successful result of dispatching a request
#[derive(Debug, Clone)]
pub enum DispatchOutcome {
    /// A method was selected
    Matched(Dispatched),
    /// An OPTIONS request with no OPTIONS method: the verbs the path answers
    Options { allowed: BTreeSet<HttpMethod> },
}

impl DispatchOutcome {
    pub fn dispatched(&self) -> Option<&Dispatched> {
        match self {
            DispatchOutcome::Matched(dispatched) => Some(dispatched),
            DispatchOutcome::Options { .. } => None,
        }
    }

    pub fn into_dispatched(self) -> Option<Dispatched> {
        match self {
            DispatchOutcome::Matched(dispatched) => Some(dispatched),
            DispatchOutcome::Options { .. } => None,
        }
    }

    pub fn allowed_methods(&self) -> Option<&BTreeSet<HttpMethod>> {
        match self {
            DispatchOutcome::Options { allowed } => Some(allowed),
            DispatchOutcome::Matched(_) => None,
        }
    }
}
