//! Dispatch error response formatting

use super::DispatchError;
use http::header::{ALLOW, CONTENT_TYPE};
use http::{HeaderValue, Response, StatusCode};
use serde_json::json;

impl DispatchError {
    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            DispatchError::NotFound { .. } => StatusCode::NOT_FOUND,
            DispatchError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            DispatchError::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            DispatchError::NotAcceptable { .. } => StatusCode::NOT_ACCEPTABLE,
            DispatchError::LocatorFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error hint for user guidance
    pub fn error_hint(&self) -> Option<&'static str> {
        match self {
            DispatchError::NotFound { .. } => Some("Check the request path"),
            DispatchError::MethodNotAllowed { .. } => Some("Use one of the methods listed in the Allow header"),
            DispatchError::UnsupportedMediaType { .. } => Some("Send the entity with a supported Content-Type"),
            DispatchError::NotAcceptable { .. } => Some("Relax the Accept header"),
            DispatchError::LocatorFailed { .. } => None,
        }
    }

    /// `Allow` header value for 405 responses
    pub fn allow_header(&self) -> Option<HeaderValue> {
        let allowed = self.allowed_methods()?;
        let value = allowed
            .iter()
            .map(|method| method.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        HeaderValue::from_str(&value).ok()
    }

    /// JSON error body
    pub fn to_json(&self) -> serde_json::Value {
        let mut body = json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "hint": self.error_hint()
            }
        });
        if let Some(allowed) = self.allowed_methods() {
            let allowed: Vec<&str> = allowed.iter().map(|method| method.as_str()).collect();
            body["error"]["allowed"] = json!(allowed);
        }
        body
    }

    /// Build an HTTP response carrying the JSON error body
    pub fn to_response(&self) -> Response<String> {
        let mut response = Response::new(self.to_json().to_string());
        *response.status_mut() = self.status_code();
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(allow) = self.allow_header() {
            response.headers_mut().insert(ALLOW, allow);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::negotiation::MediaType;
    use crate::resource::HttpMethod;
    use std::collections::BTreeSet;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(DispatchError::not_found("/x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            DispatchError::method_not_allowed(HttpMethod::POST, BTreeSet::new()).status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            DispatchError::unsupported_media_type(None).status_code(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            DispatchError::not_acceptable(vec![]).status_code(),
            StatusCode::NOT_ACCEPTABLE
        );
        assert_eq!(
            DispatchError::locator_failed("/items", "boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_messages() {
        let allowed: BTreeSet<_> = [HttpMethod::GET, HttpMethod::HEAD].into_iter().collect();
        let error = DispatchError::method_not_allowed(HttpMethod::POST, allowed);
        assert_eq!(error.to_string(), "Method POST not allowed, allowed methods: GET, HEAD");

        let error = DispatchError::unsupported_media_type(Some(MediaType::text_plain()));
        assert_eq!(error.to_string(), "Unsupported media type: text/plain");

        let error = DispatchError::not_acceptable(vec![MediaType::text_plain(), MediaType::application_json()]);
        assert_eq!(
            error.to_string(),
            "Not acceptable: no producible media type matches [text/plain, application/json]"
        );
    }

    #[test]
    fn test_allow_header() {
        let allowed: BTreeSet<_> = [HttpMethod::PUT, HttpMethod::GET].into_iter().collect();
        let error = DispatchError::method_not_allowed(HttpMethod::POST, allowed);
        assert_eq!(error.allow_header().unwrap(), "GET, PUT");
        assert!(DispatchError::not_found("/x").allow_header().is_none());
    }

    #[test]
    fn test_error_response_format_consistency() {
        let error = DispatchError::not_found("/orders/42");
        let body = error.to_json();
        assert_eq!(body["error"]["code"], "RESOURCE_NOT_FOUND");
        assert_eq!(body["error"]["message"], "Resource not found: /orders/42");
        assert_eq!(body["error"]["hint"], "Check the request path");

        let response = error.to_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_method_not_allowed_response_has_allow_header() {
        let allowed: BTreeSet<_> = [HttpMethod::GET].into_iter().collect();
        let response = DispatchError::method_not_allowed(HttpMethod::DELETE, allowed).to_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[ALLOW], "GET");
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(response.body()).unwrap()["error"]["allowed"],
            json!(["GET"])
        );
    }
}
