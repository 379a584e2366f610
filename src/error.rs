//! Request error module
//!
//! Every way a request can be rejected, each mapped to one status code.

use hyper::StatusCode;
use thiserror::Error;

/// A rejected request
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    #[error("Content-Type must be application/json, got '{0}'")]
    UnsupportedMediaType(String),

    #[error("Content-Length header is missing or invalid")]
    InvalidContentLength,

    #[error("request body is empty")]
    EmptyBody,

    #[error("truncated body: expected {declared} bytes, received {received}")]
    TruncatedBody { declared: usize, received: usize },

    #[error("request body is not valid UTF-8")]
    InvalidUtf8,

    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("JSON body must be an object")]
    NotAnObject,

    #[error("request body too large: {size} bytes (max: {max})")]
    PayloadTooLarge { size: u64, max: u64 },

    #[error("missing field '{0}'")]
    MissingField(&'static str),

    #[error("field '{0}' must be a number")]
    NotANumber(&'static str),

    #[error("divisor must not be zero")]
    DivisionByZero,

    #[error("missing query parameter '{0}'")]
    MissingQueryParam(&'static str),

    #[error("missing user id")]
    MissingUserId,

    #[error("user id must be an integer, got '{0}'")]
    InvalidUserId(String),

    #[error("unknown path: {0}")]
    NotFound(String),

    #[error("method {method} not allowed for {path}, use {allow}")]
    MethodNotAllowed {
        method: String,
        path: String,
        allow: String,
    },

    #[error("method {0} not supported")]
    NotImplemented(String),
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::InvalidContentLength
            | Self::EmptyBody
            | Self::TruncatedBody { .. }
            | Self::InvalidUtf8
            | Self::InvalidJson(_)
            | Self::NotAnObject
            | Self::MissingQueryParam(_)
            | Self::MissingUserId
            | Self::InvalidUserId(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::MissingField(_) | Self::NotANumber(_) | Self::DivisionByZero => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::UnsupportedMediaType("text/plain".into()).status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(ApiError::EmptyBody.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotAnObject.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::MissingField("a").status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::DivisionByZero.status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::NotFound("/x".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::NotImplemented("PUT".into()).status(),
            StatusCode::NOT_IMPLEMENTED
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ApiError::DivisionByZero.to_string(),
            "divisor must not be zero"
        );
        assert_eq!(
            ApiError::TruncatedBody {
                declared: 10,
                received: 4
            }
            .to_string(),
            "truncated body: expected 10 bytes, received 4"
        );
        assert_eq!(
            ApiError::NotFound("/nope".into()).to_string(),
            "unknown path: /nope"
        );
    }
}
