//! HTTP protocol layer module
//!
//! Request model, JSON body validation and response builders, shared by every handler.

pub mod body;
pub mod request;
pub mod response;

// Re-export commonly used types
pub use request::HttpRequest;
pub use response::{
    empty_response, json_error, json_response, method_not_allowed, text_error, text_response,
};

/// Response type produced by every handler
pub type HttpResponse = hyper::Response<http_body_util::Full<hyper::body::Bytes>>;
