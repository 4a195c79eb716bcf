//! JSON response builders shared by the route handlers

use bytes::Bytes;
use http_body_util::Full;
use hyper::header::CONTENT_TYPE;
use hyper::{Response, StatusCode};
use serde::Serialize;
use tracing::error;

/// Longest error message echoed to clients
pub const ERROR_DETAIL_MAX_CHARS: usize = 200;

/// Serialize `body` as a JSON response
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let (status, json) = match serde_json::to_vec(body) {
        Ok(json) => (status, Bytes::from(json)),
        Err(e) => {
            error!("Failed to serialize response: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Bytes::from_static(br#"{"detail":"Failed to serialize response"}"#),
            )
        }
    };

    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .body(Full::new(json))
        .unwrap_or_default()
}

/// `{"detail": message}` with the message cut to [`ERROR_DETAIL_MAX_CHARS`]
pub fn detail_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    let detail = crate::types::truncate_chars(message, ERROR_DETAIL_MAX_CHARS);
    json_response(status, &serde_json::json!({ "detail": detail }))
}

pub fn not_found_response() -> Response<Full<Bytes>> {
    detail_response(StatusCode::NOT_FOUND, "Not Found")
}

pub fn method_not_allowed_response() -> Response<Full<Bytes>> {
    detail_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}
