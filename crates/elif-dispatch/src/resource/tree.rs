//! The registry of root resources

use super::node::ResourceNode;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Root resources in registration order
#[derive(Debug, Clone, Default)]
pub struct ResourceTree {
    roots: Vec<Arc<ResourceNode>>,
}

/// Introspection entry for a registered template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteDescription {
    pub resource: String,
    pub template: String,
    pub kind: RouteKind,
    pub methods: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteKind {
    Method,
    Locator,
}

impl ResourceTree {
    pub fn new() -> Self {
        Self { roots: Vec::new() }
    }

    pub fn builder() -> ResourceTreeBuilder {
        ResourceTreeBuilder::new()
    }

    pub fn roots(&self) -> &[Arc<ResourceNode>] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Normalized templates of every root resource
    pub fn root_templates(&self) -> Vec<String> {
        self.roots
            .iter()
            .map(|root| root.template().pattern().to_string())
            .collect()
    }

    /// Every statically known template with the verbs it answers
    ///
    /// Resources returned by locators are only known at dispatch time, so
    /// locators are listed without descending into them.
    pub fn describe(&self) -> Vec<RouteDescription> {
        let mut routes = Vec::new();
        for root in &self.roots {
            let base = root.template().pattern();

            let mut by_template: Vec<(String, Vec<String>)> = Vec::new();
            for method in root.methods() {
                let template = format!("{}{}", base, method.template().pattern());
                let verb = method.http_method().to_string();
                match by_template.iter_mut().find(|(t, _)| *t == template) {
                    Some((_, verbs)) => {
                        if !verbs.contains(&verb) {
                            verbs.push(verb);
                        }
                    }
                    None => by_template.push((template, vec![verb])),
                }
            }

            routes.extend(by_template.into_iter().map(|(template, methods)| RouteDescription {
                resource: root.name().to_string(),
                template,
                kind: RouteKind::Method,
                methods,
            }));

            routes.extend(root.locators().iter().map(|locator| RouteDescription {
                resource: root.name().to_string(),
                template: format!("{}{}", base, locator.template().pattern()),
                kind: RouteKind::Locator,
                methods: Vec::new(),
            }));
        }
        routes
    }
}

/// Builder for the resource tree
#[derive(Debug, Default)]
pub struct ResourceTreeBuilder {
    roots: Vec<Arc<ResourceNode>>,
}

impl ResourceTreeBuilder {
    pub fn new() -> Self {
        Self { roots: Vec::new() }
    }

    /// Register a root resource
    pub fn root(mut self, node: ResourceNode) -> Self {
        self.roots.push(Arc::new(node));
        self
    }

    /// Register an already shared root resource
    pub fn shared_root(mut self, node: Arc<ResourceNode>) -> Self {
        self.roots.push(node);
        self
    }

    pub fn build(self) -> ResourceTree {
        for (index, root) in self.roots.iter().enumerate() {
            let pattern = root.template().pattern();
            if let Some(earlier) = self.roots[..index]
                .iter()
                .find(|r| r.template().pattern() == pattern)
            {
                warn!(
                    resource = %root.name(),
                    shadowed_by = %earlier.name(),
                    template = %pattern,
                    "Root resources share a template, the earlier registration wins ties"
                );
            }
        }

        debug!(roots = self.roots.len(), "Built resource tree");
        ResourceTree { roots: self.roots }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{ResourceMethod, SubResourceLocator};
    use tracing_test::traced_test;

    fn tree() -> ResourceTree {
        let items = Arc::new(
            ResourceNode::builder("items")
                .method(ResourceMethod::get("list_items"))
                .build(),
        );

        ResourceTree::builder()
            .root(
                ResourceNode::builder("orders")
                    .path("/orders")
                    .method(ResourceMethod::get("list"))
                    .method(ResourceMethod::post("create"))
                    .method(ResourceMethod::get("show").path("/{id}"))
                    .locator(SubResourceLocator::to_node("items", "/{id}/items", items))
                    .build(),
            )
            .root(ResourceNode::builder("health").path("health/").method(ResourceMethod::get("ping")).build())
            .build()
    }

    #[test]
    fn test_root_templates() {
        assert_eq!(tree().root_templates(), vec!["/orders", "/health"]);
        assert!(ResourceTree::new().is_empty());
    }

    #[test]
    fn test_describe() {
        let routes = tree().describe();
        assert_eq!(routes.len(), 4);

        assert_eq!(routes[0].template, "/orders");
        assert_eq!(routes[0].methods, vec!["GET", "POST"]);
        assert_eq!(routes[1].template, "/orders/{id}");
        assert_eq!(routes[2].kind, RouteKind::Locator);
        assert_eq!(routes[2].template, "/orders/{id}/items");
        assert_eq!(routes[3].resource, "health");
    }

    #[test]
    fn test_describe_serializes() {
        let json = serde_json::to_value(tree().describe()).unwrap();
        assert_eq!(json[2]["kind"], "locator");
        assert_eq!(json[0]["methods"][1], "POST");
    }

    #[traced_test]
    #[test]
    fn test_duplicate_roots_are_reported() {
        ResourceTree::builder()
            .root(ResourceNode::builder("a").path("/x").build())
            .root(ResourceNode::builder("b").path("/x/").build())
            .build();
        assert!(logs_contain("Root resources share a template"));
    }
}
