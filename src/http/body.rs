//! JSON body validation module
//!
//! Every POST endpoint reads its input through [`json_object`].

use hyper::header::CONTENT_TYPE;
use serde_json::{Map, Value};

use super::request::HttpRequest;
use crate::error::ApiError;

const JSON_MEDIA_TYPE: &str = "application/json";

/// Validate the body of a request and parse it as a JSON object
///
/// Checks run in a fixed order and the first failure wins:
/// media type, declared length, received length, UTF-8, JSON syntax, object shape.
pub fn json_object(req: &HttpRequest) -> Result<Map<String, Value>, ApiError> {
    check_content_type(req)?;
    let bytes = declared_body(req)?;

    let text = std::str::from_utf8(bytes).map_err(|_| ApiError::InvalidUtf8)?;
    let value: Value =
        serde_json::from_str(text).map_err(|e| ApiError::InvalidJson(e.to_string()))?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ApiError::NotAnObject),
    }
}

/// Checks that only need the request head, run before the body is read
///
/// The media type is checked first, so a wrong `Content-Type` answers 415
/// even when the declared length is above `max_body_size` (413).
/// An unparsable length passes here and is rejected by [`json_object`].
pub fn admit(req: &HttpRequest, max_body_size: u64) -> Result<(), ApiError> {
    check_content_type(req)?;

    match req.content_length() {
        Ok(Some(size)) => match u64::try_from(size) {
            Ok(size) if size > max_body_size => Err(ApiError::PayloadTooLarge {
                size,
                max: max_body_size,
            }),
            _ => Ok(()),
        },
        _ => Ok(()),
    }
}

/// Only the media type counts; `charset` and other parameters are ignored
fn check_content_type(req: &HttpRequest) -> Result<(), ApiError> {
    let content_type = req.header(CONTENT_TYPE.as_str()).unwrap_or_default();
    let media_type = content_type.split(';').next().unwrap_or_default().trim();

    if media_type.eq_ignore_ascii_case(JSON_MEDIA_TYPE) {
        Ok(())
    } else {
        Err(ApiError::UnsupportedMediaType(content_type.to_string()))
    }
}

/// Exactly the declared number of body bytes
fn declared_body(req: &HttpRequest) -> Result<&[u8], ApiError> {
    let declared = req.content_length()?.unwrap_or(0);
    if declared <= 0 {
        return Err(ApiError::EmptyBody);
    }

    let declared = usize::try_from(declared).map_err(|_| ApiError::InvalidContentLength)?;
    let received = req.body.len();
    if received < declared {
        return Err(ApiError::TruncatedBody { declared, received });
    }

    Ok(&req.body[..declared])
}
