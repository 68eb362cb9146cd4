pub mod dispatch_error;
pub mod template_error;
pub mod responses;

pub use dispatch_error::*;
pub use template_error::*;
