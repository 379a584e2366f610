//! HTTP response building module
//!
//! Every response is built whole and handed to hyper as a single `Full` body.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{ALLOW, CONTENT_TYPE};
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::error::ApiError;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Build JSON response
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    match serde_json::to_vec(body) {
        Ok(json) => Response::builder()
            .status(status)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(Full::new(Bytes::from(json)))
            .unwrap_or_else(|e| {
                log_build_error(status, &e);
                Response::new(Full::new(Bytes::new()))
            }),
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize response: {e}"));
            let mut resp = Response::new(Full::new(Bytes::from_static(
                br#"{"error":"Internal server error"}"#,
            )));
            *resp.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            resp
        }
    }
}

/// Build plain text response
pub fn text_response(status: StatusCode, body: impl Into<String>) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, TEXT_CONTENT_TYPE)
        .body(Full::new(Bytes::from(body.into())))
        .unwrap_or_else(|e| {
            log_build_error(status, &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build a response with a status and no body
pub fn empty_response(status: StatusCode) -> Response<Full<Bytes>> {
    let mut resp = Response::new(Full::new(Bytes::new()));
    *resp.status_mut() = status;
    resp
}

/// `{"error": "<message>"}` with the error's own status
pub fn json_error(err: &ApiError) -> Response<Full<Bytes>> {
    json_response(err.status(), &serde_json::json!({ "error": err.to_string() }))
}

/// Error message as plain text with the error's own status
pub fn text_error(err: &ApiError) -> Response<Full<Bytes>> {
    text_response(err.status(), err.to_string())
}

/// Build 405 Method Not Allowed response naming the permitted methods
pub fn method_not_allowed(method: &str, path: &str, allow: &str) -> Response<Full<Bytes>> {
    let err = ApiError::MethodNotAllowed {
        method: method.to_string(),
        path: path.to_string(),
        allow: allow.to_string(),
    };
    let mut resp = json_error(&err);
    match allow.parse() {
        Ok(value) => {
            resp.headers_mut().insert(ALLOW, value);
        }
        Err(e) => crate::logger::log_error(&format!("Invalid Allow header '{allow}': {e}")),
    }
    resp
}

/// Log response build error
fn log_build_error(status: StatusCode, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
