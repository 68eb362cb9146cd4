//! Sub-resource locators
//!
//! A locator claims a path prefix below its resource and, when selected,
//! produces the resource node that handles the rest of the path.

use super::node::ResourceNode;
use crate::matching::PathBindings;
use crate::template::Template;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Failure reported by a locator factory
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct LocatorError {
    pub message: String,
}

impl LocatorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Produces the next resource node from the variables bound so far
pub type LocatorFactory =
    Arc<dyn Fn(&PathBindings) -> Result<Arc<ResourceNode>, LocatorError> + Send + Sync>;

#[derive(Clone)]
pub struct SubResourceLocator {
    id: String,
    template: Template,
    factory: LocatorFactory,
}

impl SubResourceLocator {
    pub fn new<F>(id: impl Into<String>, template: impl Into<Template>, factory: F) -> Self
    where
        F: Fn(&PathBindings) -> Result<Arc<ResourceNode>, LocatorError> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            template: template.into(),
            factory: Arc::new(factory),
        }
    }

    /// A locator that always hands out the same node
    pub fn to_node(id: impl Into<String>, template: impl Into<Template>, node: Arc<ResourceNode>) -> Self {
        Self::new(id, template, move |_| Ok(Arc::clone(&node)))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Obtain the sub-resource
    pub fn locate(&self, bindings: &PathBindings) -> Result<Arc<ResourceNode>, LocatorError> {
        (self.factory)(bindings)
    }

    pub(crate) fn with_template(mut self, template: Template) -> Self {
        self.template = template;
        self
    }
}

impl fmt::Debug for SubResourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubResourceLocator")
            .field("id", &self.id)
            .field("template", &self.template.pattern())
            .field("factory", &"<factory>")
            .finish()
    }
}
