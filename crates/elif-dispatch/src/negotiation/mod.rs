//! Content negotiation
//!
//! Media type parsing and compatibility, Accept header handling and the
//! selection of a response media type for a dispatched method.

pub mod media_type;
pub mod negotiator;

pub use media_type::{MediaType, MediaTypeError, AcceptedMediaType, AcceptedMediaTypes};
pub use negotiator::{ContentNegotiator, ProducibleTypes, NoInference};
