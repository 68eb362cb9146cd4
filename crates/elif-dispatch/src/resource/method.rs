//! HTTP verbs and resource methods

use crate::negotiation::{AcceptedMediaTypes, ContentNegotiator, MediaType};
use crate::template::Template;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// HTTP methods a resource method can answer
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HttpMethod {
    GET,
    POST,
    PUT,
    DELETE,
    PATCH,
    HEAD,
    OPTIONS,
    TRACE,
    CONNECT,
    /// Any other token, stored uppercase
    Extension(String),
}

impl HttpMethod {
    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::HEAD => "HEAD",
            HttpMethod::OPTIONS => "OPTIONS",
            HttpMethod::TRACE => "TRACE",
            HttpMethod::CONNECT => "CONNECT",
            HttpMethod::Extension(name) => name,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Ok(match upper.as_str() {
            "GET" => HttpMethod::GET,
            "POST" => HttpMethod::POST,
            "PUT" => HttpMethod::PUT,
            "DELETE" => HttpMethod::DELETE,
            "PATCH" => HttpMethod::PATCH,
            "HEAD" => HttpMethod::HEAD,
            "OPTIONS" => HttpMethod::OPTIONS,
            "TRACE" => HttpMethod::TRACE,
            "CONNECT" => HttpMethod::CONNECT,
            _ => HttpMethod::Extension(upper),
        })
    }
}

impl From<&http::Method> for HttpMethod {
    fn from(method: &http::Method) -> Self {
        match *method {
            http::Method::GET => HttpMethod::GET,
            http::Method::POST => HttpMethod::POST,
            http::Method::PUT => HttpMethod::PUT,
            http::Method::DELETE => HttpMethod::DELETE,
            http::Method::PATCH => HttpMethod::PATCH,
            http::Method::HEAD => HttpMethod::HEAD,
            http::Method::OPTIONS => HttpMethod::OPTIONS,
            http::Method::TRACE => HttpMethod::TRACE,
            http::Method::CONNECT => HttpMethod::CONNECT,
            ref other => HttpMethod::Extension(other.as_str().to_ascii_uppercase()),
        }
    }
}

impl From<http::Method> for HttpMethod {
    fn from(method: http::Method) -> Self {
        HttpMethod::from(&method)
    }
}

/// A handler slot on a resource: a verb, an optional sub-path and media types
#[derive(Debug, Clone)]
pub struct ResourceMethod {
    id: String,
    method: HttpMethod,
    template: Template,
    consumes: Vec<MediaType>,
    produces: Vec<MediaType>,
}

impl ResourceMethod {
    /// A resource method answering `method` on the resource itself
    pub fn new(id: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            id: id.into(),
            method,
            template: Template::new(""),
            consumes: Vec::new(),
            produces: Vec::new(),
        }
    }

    pub fn get(id: impl Into<String>) -> Self {
        Self::new(id, HttpMethod::GET)
    }

    pub fn post(id: impl Into<String>) -> Self {
        Self::new(id, HttpMethod::POST)
    }

    pub fn put(id: impl Into<String>) -> Self {
        Self::new(id, HttpMethod::PUT)
    }

    pub fn delete(id: impl Into<String>) -> Self {
        Self::new(id, HttpMethod::DELETE)
    }

    /// Turn this into a sub-resource method below the resource
    pub fn path(mut self, template: impl Into<Template>) -> Self {
        self.template = template.into();
        self
    }

    /// Add an accepted request entity type; unparsable values are skipped
    pub fn consumes(mut self, media_type: &str) -> Self {
        match media_type.parse() {
            Ok(parsed) => self.consumes.push(parsed),
            Err(e) => warn!(method = %self.id, media_type, error = %e, "Ignoring consumed media type"),
        }
        self
    }

    /// Add a producible response type; unparsable values are skipped
    pub fn produces(mut self, media_type: &str) -> Self {
        match media_type.parse() {
            Ok(parsed) => self.produces.push(parsed),
            Err(e) => warn!(method = %self.id, media_type, error = %e, "Ignoring produced media type"),
        }
        self
    }

    pub fn consumes_type(mut self, media_type: MediaType) -> Self {
        self.consumes.push(media_type);
        self
    }

    pub fn produces_type(mut self, media_type: MediaType) -> Self {
        self.produces.push(media_type);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn http_method(&self) -> &HttpMethod {
        &self.method
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn consumed(&self) -> &[MediaType] {
        &self.consumes
    }

    pub fn produced(&self) -> &[MediaType] {
        &self.produces
    }

    /// True for methods with a non-empty sub-path
    pub fn is_sub_resource_method(&self) -> bool {
        !self.template.pattern().is_empty()
    }

    /// HEAD requests are also answered by GET methods
    pub fn accepts_verb(&self, requested: &HttpMethod) -> bool {
        self.method == *requested || (*requested == HttpMethod::HEAD && self.method == HttpMethod::GET)
    }

    /// True when a request entity of `given` type can be read
    ///
    /// No declared types means anything is accepted. A request without an
    /// entity type is treated as `*/*`.
    pub fn consumes_media_type(&self, given: Option<&MediaType>) -> bool {
        if self.consumes.is_empty() {
            return true;
        }
        match given {
            Some(given) => self.consumes.iter().any(|c| c.includes(given)),
            None => true,
        }
    }

    /// True when some declared produced type is acceptable to the client
    pub fn produces_acceptable(&self, accepted: &AcceptedMediaTypes) -> bool {
        ContentNegotiator::is_acceptable(&self.produces, accepted)
    }

    /// How closely the declared consumed types fit the request entity type
    ///
    /// 2 for a type/subtype match, 1 for `type/*`, 0 for `*/*` or nothing declared.
    pub fn consumes_score(&self, given: Option<&MediaType>) -> u8 {
        let Some(given) = given else {
            return 0;
        };
        self.consumes
            .iter()
            .filter(|c| c.includes(given))
            .map(|c| c.concreteness())
            .max()
            .unwrap_or(0)
    }

    /// Best preference of the client among the declared produced types
    ///
    /// Higher is better: quality of the first compatible Accept entry,
    /// then the concreteness of the resulting type.
    pub fn produces_score(&self, accepted: &AcceptedMediaTypes) -> (u16, u8) {
        let produced = if self.produces.is_empty() {
            vec![MediaType::all()]
        } else {
            self.produces.clone()
        };

        let accepted = accepted.or_all();
        let best = accepted
            .iter()
            .flat_map(|a| {
                produced
                    .iter()
                    .filter(move |p| a.media_type.is_compatible(p))
                    .map(move |p| (a.quality_millis(), MediaType::most_specific(p, &a.media_type).concreteness()))
            })
            .max();
        best.unwrap_or((0, 0))
    }

    pub(crate) fn with_template(mut self, template: Template) -> Self {
        self.template = template;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mt(value: &str) -> MediaType {
        value.parse().unwrap()
    }

    #[test]
    fn test_method_from_str() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::GET);
        assert_eq!("Options".parse::<HttpMethod>().unwrap(), HttpMethod::OPTIONS);
        assert_eq!(
            "propfind".parse::<HttpMethod>().unwrap(),
            HttpMethod::Extension("PROPFIND".to_string())
        );
        assert_eq!(HttpMethod::Extension("PROPFIND".to_string()).to_string(), "PROPFIND");
    }

    #[test]
    fn test_method_from_http() {
        assert_eq!(HttpMethod::from(http::Method::DELETE), HttpMethod::DELETE);
        let custom = http::Method::from_bytes(b"PURGE").unwrap();
        assert_eq!(HttpMethod::from(&custom), HttpMethod::Extension("PURGE".to_string()));
    }

    #[test]
    fn test_head_is_answered_by_get() {
        let get = ResourceMethod::get("show");
        assert!(get.accepts_verb(&HttpMethod::GET));
        assert!(get.accepts_verb(&HttpMethod::HEAD));
        assert!(!get.accepts_verb(&HttpMethod::POST));
        assert!(!ResourceMethod::post("create").accepts_verb(&HttpMethod::HEAD));
    }

    #[test]
    fn test_consumes_media_type() {
        let method = ResourceMethod::post("create").consumes("application/json").consumes("text/*");
        assert!(method.consumes_media_type(Some(&mt("application/json"))));
        assert!(method.consumes_media_type(Some(&mt("text/csv"))));
        assert!(!method.consumes_media_type(Some(&mt("application/xml"))));
        assert!(method.consumes_media_type(None));
        assert!(ResourceMethod::post("any").consumes_media_type(Some(&mt("image/png"))));
    }

    #[test]
    fn test_consumes_score() {
        let exact = ResourceMethod::post("exact").consumes("application/json");
        let main = ResourceMethod::post("main").consumes("application/*");
        let any = ResourceMethod::post("any");
        let json = mt("application/json");
        assert_eq!(exact.consumes_score(Some(&json)), 2);
        assert_eq!(main.consumes_score(Some(&json)), 1);
        assert_eq!(any.consumes_score(Some(&json)), 0);
    }

    #[test]
    fn test_produces_score_follows_accept_quality() {
        let accepted = AcceptedMediaTypes::parse("application/xml, application/json;q=0.5");
        let json = ResourceMethod::get("json").produces("application/json");
        let xml = ResourceMethod::get("xml").produces("application/xml");
        assert!(xml.produces_score(&accepted) > json.produces_score(&accepted));
    }

    #[test]
    fn test_invalid_media_types_are_skipped() {
        let method = ResourceMethod::get("show").produces("").produces("text/plain");
        assert_eq!(method.produced(), &[MediaType::text_plain()]);
    }

    #[test]
    fn test_sub_resource_method() {
        assert!(!ResourceMethod::get("list").is_sub_resource_method());
        assert!(ResourceMethod::get("show").path("/{id}").is_sub_resource_method());
    }
}
