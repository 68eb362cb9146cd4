//! Resource nodes
//!
//! A node is a resource class: a path template, the methods it answers and
//! the sub-resource locators it delegates to. Templates registered on a node
//! are normalized and switched to prefix matching when the node is built.

use super::locator::{LocatorError, SubResourceLocator};
use super::method::{HttpMethod, ResourceMethod};
use crate::matching::{match_resource, MatchResult, PathBindings, RemainingPath};
use crate::template::{normalize_path, MatchingMode, Template};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct ResourceNode {
    name: String,
    template: Template,
    methods: Vec<Arc<ResourceMethod>>,
    locators: Vec<SubResourceLocator>,
}

impl ResourceNode {
    pub fn builder(name: impl Into<String>) -> ResourceNodeBuilder {
        ResourceNodeBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The resource's own path template (used when it is a root)
    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn methods(&self) -> &[Arc<ResourceMethod>] {
        &self.methods
    }

    pub fn locators(&self) -> &[SubResourceLocator] {
        &self.locators
    }

    /// True when the node can consume a non-empty path remainder
    pub fn has_sub_resources(&self) -> bool {
        !self.locators.is_empty() || self.methods.iter().any(|m| m.is_sub_resource_method())
    }

    /// Methods whose template covers the remaining path
    ///
    /// For an empty (or `/`) remainder only methods without a sub-path
    /// qualify. Otherwise a method's template has to consume the remainder
    /// up to at most a trailing `/`.
    pub fn methods_for_path(&self, remaining: &RemainingPath) -> Vec<(Arc<ResourceMethod>, MatchResult)> {
        self.methods
            .iter()
            .filter(|method| !remaining.is_empty_or_slash() || !method.is_sub_resource_method())
            .filter_map(|method| {
                let result = match_resource(method.template(), remaining)?;
                result
                    .remainder_is_empty_or_slash()
                    .then(|| (Arc::clone(method), result))
            })
            .collect()
    }

    /// Verbs the methods covering the remaining path answer, with HEAD implied by GET
    pub fn allowed_methods(&self, remaining: &RemainingPath) -> BTreeSet<HttpMethod> {
        allowed_verbs(self.methods_for_path(remaining).iter().map(|(m, _)| m.as_ref()))
    }
}

/// Collect the verbs of `methods`, adding HEAD whenever GET is present
pub fn allowed_verbs<'a>(methods: impl IntoIterator<Item = &'a ResourceMethod>) -> BTreeSet<HttpMethod> {
    let mut allowed: BTreeSet<HttpMethod> = methods
        .into_iter()
        .map(|m| m.http_method().clone())
        .collect();
    if allowed.contains(&HttpMethod::GET) {
        allowed.insert(HttpMethod::HEAD);
    }
    allowed
}

/// Prepare a template for resource matching
pub(crate) fn resource_template(template: Template) -> Template {
    let pattern = normalize_path(template.pattern());
    let prepared = template
        .with_pattern(pattern)
        .with_mode(MatchingMode::StartsWith);
    prepared.compile();
    prepared
}

/// Builder for resource nodes
#[derive(Debug)]
pub struct ResourceNodeBuilder {
    name: String,
    template: Template,
    methods: Vec<ResourceMethod>,
    locators: Vec<SubResourceLocator>,
}

impl ResourceNodeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template: Template::new(""),
            methods: Vec::new(),
            locators: Vec::new(),
        }
    }

    /// Path template of the resource when registered as a root
    pub fn path(mut self, template: impl Into<Template>) -> Self {
        self.template = template.into();
        self
    }

    pub fn method(mut self, method: ResourceMethod) -> Self {
        self.methods.push(method);
        self
    }

    pub fn locator(mut self, locator: SubResourceLocator) -> Self {
        self.locators.push(locator);
        self
    }

    /// Register a locator built from a factory closure
    pub fn sub_resource<F>(self, id: impl Into<String>, template: impl Into<Template>, factory: F) -> Self
    where
        F: Fn(&PathBindings) -> Result<Arc<ResourceNode>, LocatorError> + Send + Sync + 'static,
    {
        self.locator(SubResourceLocator::new(id, template, factory))
    }

    /// Build the node, normalizing and compiling every template
    pub fn build(self) -> ResourceNode {
        let template = resource_template(self.template);

        let methods: Vec<Arc<ResourceMethod>> = self
            .methods
            .into_iter()
            .map(|method| {
                let template = resource_template(method.template().clone());
                Arc::new(method.with_template(template))
            })
            .collect();

        let locators: Vec<SubResourceLocator> = self
            .locators
            .into_iter()
            .map(|locator| {
                let template = resource_template(locator.template().clone());
                locator.with_template(template)
            })
            .collect();

        for (index, method) in methods.iter().enumerate() {
            let shadowed = methods[..index].iter().any(|earlier| {
                earlier.http_method() == method.http_method()
                    && earlier.template().pattern() == method.template().pattern()
                    && earlier.consumed() == method.consumed()
                    && earlier.produced() == method.produced()
            });
            if shadowed {
                warn!(
                    resource = %self.name,
                    method = %method.id(),
                    verb = %method.http_method(),
                    template = %method.template(),
                    "Ambiguous resource method, an earlier registration will always win"
                );
            }
        }

        for (index, locator) in locators.iter().enumerate() {
            let pattern = locator.template().pattern();
            if locators[..index].iter().any(|l| l.template().pattern() == pattern) {
                warn!(
                    resource = %self.name,
                    locator = %locator.id(),
                    template = %pattern,
                    "Ambiguous sub-resource locator, an earlier registration will always win"
                );
            }
        }

        ResourceNode {
            name: self.name,
            template,
            methods,
            locators,
        }
    }
}
