//! Permissive CORS
//!
//! Any origin, method and header is allowed, with credentials. Browsers
//! reject `Access-Control-Allow-Origin: *` on credentialed requests, so a
//! request that names its origin gets that origin echoed back instead.

use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{
    HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
    ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE,
    ACCESS_CONTROL_REQUEST_HEADERS, ACCESS_CONTROL_REQUEST_METHOD, ORIGIN, VARY,
};
use hyper::{Response, StatusCode};

const ALLOWED_METHODS: &str = "DELETE, GET, HEAD, OPTIONS, PATCH, POST, PUT";
const PREFLIGHT_MAX_AGE: &str = "600";

/// CORS-relevant parts of a request, captured before the body is consumed
#[derive(Debug, Clone, Default)]
pub struct CorsRequest {
    origin: Option<HeaderValue>,
    requested_method: Option<HeaderValue>,
    requested_headers: Option<HeaderValue>,
}

impl CorsRequest {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            origin: headers.get(ORIGIN).cloned(),
            requested_method: headers.get(ACCESS_CONTROL_REQUEST_METHOD).cloned(),
            requested_headers: headers.get(ACCESS_CONTROL_REQUEST_HEADERS).cloned(),
        }
    }

    /// Add allow-origin and credentials headers to `response`
    pub fn apply(&self, response: &mut Response<Full<Bytes>>) {
        let headers = response.headers_mut();
        match &self.origin {
            Some(origin) => {
                headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
                headers.insert(
                    ACCESS_CONTROL_ALLOW_CREDENTIALS,
                    HeaderValue::from_static("true"),
                );
                headers.append(VARY, HeaderValue::from_static("Origin"));
            }
            None => {
                headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
            }
        }
    }

    /// Whether this is a CORS preflight rather than a plain OPTIONS request
    pub fn is_preflight(&self) -> bool {
        self.origin.is_some() && self.requested_method.is_some()
    }

    /// Answer a preflight (OPTIONS) request
    pub fn preflight(&self) -> Response<Full<Bytes>> {
        // Any header is allowed: echo whatever the browser asks for
        let allowed_headers = self
            .requested_headers
            .clone()
            .unwrap_or_else(|| HeaderValue::from_static("*"));

        let mut response = Response::builder()
            .status(StatusCode::OK)
            .header(ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS)
            .header(ACCESS_CONTROL_MAX_AGE, PREFLIGHT_MAX_AGE)
            .header(ACCESS_CONTROL_ALLOW_HEADERS, allowed_headers)
            .body(Full::new(Bytes::from_static(b"OK")))
            .unwrap_or_default();

        self.apply(&mut response);
        response
    }
}
