//! Request dispatching for elif.rs resources
//!
//! This module provides:
//! - The request view the dispatcher works on
//! - The three-phase dispatcher (root, sub-resources, method)
//! - Dispatch outcomes with bindings, matched URIs and the response media type

pub mod request;
pub mod outcome;
pub mod dispatcher;

pub use request::DispatchRequest;
pub use outcome::{DispatchOutcome, Dispatched, DispatchSummary};
pub use dispatcher::Dispatcher;
