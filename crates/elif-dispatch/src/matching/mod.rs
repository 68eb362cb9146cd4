//! Request path matching for elif.rs resources
//!
//! This module provides the pieces shared by every dispatch phase:
//! - Match results and accumulated path bindings
//! - The remaining request path with matrix parameter handling
//! - Segment-aware prefix matching of resource templates
//! - Specificity ranking of competing candidates

pub mod result;
pub mod path;
pub mod specificity;

pub use result::{MatchResult, PathBindings, BindingError};
pub use path::{RemainingPath, match_resource};
pub use specificity::{Specificity, Ranked, most_specific};
