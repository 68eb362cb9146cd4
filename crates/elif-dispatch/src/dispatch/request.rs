//! Dispatch request view

use crate::negotiation::{AcceptedMediaTypes, MediaType};
use crate::resource::HttpMethod;
use http::header::{ACCEPT, CONTENT_TYPE};
use tracing::warn;

/// The parts of an HTTP request the dispatcher looks at
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchRequest {
    method: HttpMethod,
    path: String,
    entity_media_type: Option<MediaType>,
    accepted: AcceptedMediaTypes,
    forced_media_type: Option<MediaType>,
}

impl DispatchRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            entity_media_type: None,
            accepted: AcceptedMediaTypes::new(),
            forced_media_type: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::POST, path)
    }

    /// Build from an `http::Request`, reading the path, Content-Type and Accept headers
    pub fn from_http<B>(request: &http::Request<B>) -> Self {
        let mut dispatch = Self::new(HttpMethod::from(request.method()), request.uri().path());

        if let Some(content_type) = request.headers().get(CONTENT_TYPE) {
            match content_type.to_str() {
                Ok(value) => dispatch = dispatch.with_content_type(value),
                Err(_) => warn!("Ignoring non-ASCII Content-Type header"),
            }
        }

        let accept: Vec<&str> = request
            .headers()
            .get_all(ACCEPT)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect();
        if !accept.is_empty() {
            dispatch = dispatch.with_accept(&accept.join(","));
        }

        dispatch
    }

    /// Declare the request entity's media type
    pub fn with_entity_type(mut self, media_type: MediaType) -> Self {
        self.entity_media_type = Some(media_type);
        self
    }

    /// Declare the request entity's media type from a Content-Type value
    pub fn with_content_type(mut self, content_type: &str) -> Self {
        match content_type.parse() {
            Ok(media_type) => self.entity_media_type = Some(media_type),
            Err(e) => warn!(content_type, error = %e, "Ignoring unparsable Content-Type"),
        }
        self
    }

    /// Set the acceptable response types from an Accept header value
    pub fn with_accept(mut self, accept: &str) -> Self {
        self.accepted = AcceptedMediaTypes::parse(accept);
        self
    }

    pub fn with_accepted(mut self, accepted: AcceptedMediaTypes) -> Self {
        self.accepted = accepted;
        self
    }

    /// Skip negotiation and respond with this media type
    pub fn with_forced_media_type(mut self, media_type: MediaType) -> Self {
        self.forced_media_type = Some(media_type);
        self
    }

    pub fn method(&self) -> &HttpMethod {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn entity_media_type(&self) -> Option<&MediaType> {
        self.entity_media_type.as_ref()
    }

    pub fn accepted(&self) -> &AcceptedMediaTypes {
        &self.accepted
    }

    pub fn forced_media_type(&self) -> Option<&MediaType> {
        self.forced_media_type.as_ref()
    }
}
