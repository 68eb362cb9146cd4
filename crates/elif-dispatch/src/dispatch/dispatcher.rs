//! Request dispatching
//!
//! Dispatching runs in three phases:
//! 1. identify the root resource whose template matches a prefix of the path,
//! 2. walk sub-resource locators until the path is consumed or a
//!    sub-resource method claims the rest,
//! 3. pick the method on the final resource by verb, request entity type
//!    and acceptable response types, then negotiate the response type.
//!
//! At every step competing candidates are ranked by specificity.

use super::outcome::{DispatchOutcome, Dispatched};
use super::request::DispatchRequest;
use crate::config::{ConfigResult, DispatchConfig};
use crate::errors::{DispatchError, DispatchResult};
use crate::matching::{
    match_resource, most_specific, MatchResult, PathBindings, Ranked, RemainingPath, Specificity,
};
use crate::negotiation::{ContentNegotiator, NoInference, ProducibleTypes};
use crate::resource::{
    allowed_verbs, HttpMethod, ResourceMethod, ResourceNode, ResourceTree, SubResourceLocator,
};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// A template that matched the remaining path at some dispatch step
enum Candidate<'a> {
    Root {
        node: &'a Arc<ResourceNode>,
        result: MatchResult,
    },
    SubResourceMethod {
        method: &'a Arc<ResourceMethod>,
        result: MatchResult,
    },
    SubResourceLocator {
        locator: &'a SubResourceLocator,
        result: MatchResult,
    },
}

impl Ranked for Candidate<'_> {
    fn specificity(&self) -> Specificity {
        match self {
            Candidate::Root { node, .. } => Specificity::of(node.template()),
            Candidate::SubResourceMethod { method, .. } => Specificity::of(method.template()),
            Candidate::SubResourceLocator { locator, .. } => Specificity::of(locator.template()),
        }
    }

    fn bias(&self) -> u8 {
        match self {
            Candidate::SubResourceMethod { .. } => 1,
            _ => 0,
        }
    }
}

/// Where a dispatch currently stands
struct Traversal {
    node: Arc<ResourceNode>,
    remaining: RemainingPath,
    bindings: PathBindings,
    consumed: String,
    matched_uris: Vec<String>,
}

impl Traversal {
    /// Record a matched prefix of the remaining path
    fn advance(&mut self, result: &MatchResult) {
        self.bindings.merge(result);
        let matched = &self.remaining.as_str()[..result.matched_len()];
        self.consumed.push_str(matched);
        let uri = if self.consumed.is_empty() {
            "/".to_string()
        } else {
            self.consumed.clone()
        };
        self.matched_uris.insert(0, uri);
        self.remaining = RemainingPath::from(result.remainder());
    }
}

/// Resolves requests against a resource tree
pub struct Dispatcher {
    tree: ResourceTree,
    negotiator: ContentNegotiator,
    producible: Arc<dyn ProducibleTypes>,
    strip_matrix_params: bool,
}

impl Dispatcher {
    /// Create a dispatcher with default settings
    pub fn new(tree: ResourceTree) -> Self {
        Self {
            tree,
            negotiator: ContentNegotiator::new(),
            producible: Arc::new(NoInference),
            strip_matrix_params: true,
        }
    }

    /// Create a dispatcher from configuration
    pub fn with_config(tree: ResourceTree, config: &DispatchConfig) -> ConfigResult<Self> {
        let fallback = config.fallback_media_type()?;
        Ok(Self {
            tree,
            negotiator: ContentNegotiator::with_fallback(fallback),
            producible: Arc::new(NoInference),
            strip_matrix_params: config.strip_matrix_params,
        })
    }

    /// Infer producible types for methods that declare none
    pub fn with_producible_types(mut self, producible: Arc<dyn ProducibleTypes>) -> Self {
        self.producible = producible;
        self
    }

    pub fn tree(&self) -> &ResourceTree {
        &self.tree
    }

    pub fn negotiator(&self) -> &ContentNegotiator {
        &self.negotiator
    }

    /// Resolve a request to a method, or to the allowed verbs of an OPTIONS request
    pub fn dispatch(&self, request: &DispatchRequest) -> DispatchResult<DispatchOutcome> {
        let remaining = RemainingPath::new(request.path(), self.strip_matrix_params);
        debug!(method = %request.method(), path = %remaining, "Dispatching request");

        let traversal = self.identify_root(&remaining, request.path())?;
        let traversal = self.obtain_object(traversal, request.path())?;
        self.identify_method(traversal, request)
    }

    /// Convenience wrapper around [`DispatchRequest::from_http`]
    pub fn dispatch_http<B>(&self, request: &http::Request<B>) -> DispatchResult<DispatchOutcome> {
        self.dispatch(&DispatchRequest::from_http(request))
    }

    fn identify_root(&self, remaining: &RemainingPath, path: &str) -> DispatchResult<Traversal> {
        let candidates = self.tree.roots().iter().filter_map(|node| {
            let result = match_resource(node.template(), remaining)?;
            (result.remainder_is_empty_or_slash() || node.has_sub_resources())
                .then_some(Candidate::Root { node, result })
        });

        let Some(Candidate::Root { node, result }) = most_specific(candidates) else {
            debug!(path, "No root resource matches");
            return Err(DispatchError::not_found(path));
        };
        debug!(resource = %node.name(), template = %node.template(), "Selected root resource");

        let mut traversal = Traversal {
            node: Arc::clone(node),
            remaining: remaining.clone(),
            bindings: PathBindings::new(),
            consumed: String::new(),
            matched_uris: Vec::new(),
        };
        traversal.advance(&result);
        Ok(traversal)
    }

    fn obtain_object(&self, mut traversal: Traversal, path: &str) -> DispatchResult<Traversal> {
        loop {
            if traversal.remaining.is_empty_or_slash() {
                return Ok(traversal);
            }

            let node = Arc::clone(&traversal.node);
            let remaining = &traversal.remaining;
            let methods = node.methods().iter().filter_map(|method| {
                let result = match_resource(method.template(), remaining)?;
                result
                    .remainder_is_empty_or_slash()
                    .then_some(Candidate::SubResourceMethod { method, result })
            });
            let locators = node.locators().iter().filter_map(|locator| {
                let result = match_resource(locator.template(), remaining)?;
                Some(Candidate::SubResourceLocator { locator, result })
            });

            match most_specific(methods.chain(locators)) {
                Some(Candidate::SubResourceLocator { locator, result }) => {
                    trace!(locator = %locator.id(), template = %locator.template(), "Selected sub-resource locator");
                    traversal.advance(&result);
                    let next = locator.locate(&traversal.bindings).map_err(|e| {
                        warn!(locator = %locator.id(), error = %e, "Sub-resource locator failed");
                        DispatchError::locator_failed(locator.id(), e.message)
                    })?;
                    debug!(resource = %next.name(), remaining = %traversal.remaining, "Descending into sub-resource");
                    traversal.node = next;
                }
                Some(_) => {
                    trace!(remaining = %traversal.remaining, "A sub-resource method claims the remaining path");
                    return Ok(traversal);
                }
                None => {
                    debug!(resource = %node.name(), remaining = %traversal.remaining, "No sub-resource matches");
                    return Err(DispatchError::not_found(path));
                }
            }
        }
    }

    fn identify_method(&self, mut traversal: Traversal, request: &DispatchRequest) -> DispatchResult<DispatchOutcome> {
        let node = Arc::clone(&traversal.node);
        let candidates = node.methods_for_path(&traversal.remaining);
        if candidates.is_empty() {
            debug!(resource = %node.name(), "No method covers the remaining path");
            return Err(DispatchError::not_found(request.path()));
        }

        let allowed = allowed_verbs(candidates.iter().map(|(m, _)| m.as_ref()));
        let candidates: Vec<_> = candidates
            .into_iter()
            .filter(|(m, _)| m.accepts_verb(request.method()))
            .collect();
        if candidates.is_empty() {
            if *request.method() == HttpMethod::OPTIONS {
                debug!(resource = %node.name(), "Answering OPTIONS with the allowed methods");
                return Ok(DispatchOutcome::Options { allowed });
            }
            return Err(DispatchError::method_not_allowed(request.method().clone(), allowed));
        }

        let entity = request.entity_media_type();
        let candidates: Vec<_> = candidates
            .into_iter()
            .filter(|(m, _)| m.consumes_media_type(entity))
            .collect();
        if candidates.is_empty() {
            return Err(DispatchError::unsupported_media_type(entity.cloned()));
        }

        let accepted = request.accepted();
        let candidates: Vec<_> = candidates
            .into_iter()
            .filter(|(m, _)| m.produces_acceptable(accepted))
            .collect();
        if candidates.is_empty() {
            return Err(DispatchError::not_acceptable(accepted.media_types()));
        }

        let mut best: Option<(_, (Arc<ResourceMethod>, MatchResult))> = None;
        for (method, result) in candidates {
            let key = (
                Specificity::of(method.template()),
                u8::from(method.http_method() == request.method()),
                method.consumes_score(entity),
                method.produces_score(accepted),
            );
            if best.as_ref().map_or(true, |(best_key, _)| key > *best_key) {
                best = Some((key, (method, result)));
            }
        }
        let Some((_, (method, result))) = best else {
            return Err(DispatchError::not_found(request.path()));
        };

        if result.matched_len() > 0 {
            traversal.advance(&result);
        } else {
            traversal.bindings.merge(&result);
        }

        let inferred;
        let produces = if method.produced().is_empty() {
            inferred = self.producible.producible_media_types(&method);
            inferred.as_slice()
        } else {
            method.produced()
        };
        let media_type = self
            .negotiator
            .determine(request.forced_media_type(), produces, accepted)?;

        debug!(
            resource = %node.name(),
            method = %method.id(),
            verb = %method.http_method(),
            media_type = %media_type,
            "Dispatched request"
        );

        Ok(DispatchOutcome::Matched(Dispatched {
            resource: node,
            method,
            bindings: traversal.bindings,
            media_type,
            matched_uris: traversal.matched_uris,
        }))
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("roots", &self.tree.root_templates())
            .field("negotiator", &self.negotiator)
            .field("producible", &"<producible types>")
            .field("strip_matrix_params", &self.strip_matrix_params)
            .finish()
    }
}
