//! Resource model for elif.rs dispatching
//!
//! This module provides:
//! - HTTP verbs and resource methods with consumed/produced media types
//! - Sub-resource locators that hand the rest of a path to another resource
//! - Resource nodes and the tree of root resources

pub mod method;
pub mod locator;
pub mod node;
pub mod tree;

pub use method::{HttpMethod, ResourceMethod};
pub use locator::{SubResourceLocator, LocatorFactory, LocatorError};
pub use node::{ResourceNode, ResourceNodeBuilder, allowed_verbs};
pub use tree::{ResourceTree, ResourceTreeBuilder, RouteDescription, RouteKind};
