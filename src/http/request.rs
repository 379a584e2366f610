//! Request model module
//!
//! A fully received request, decoupled from the connection it arrived on.

use std::collections::HashMap;
use std::fmt::Display;

use http_body_util::BodyExt;
use hyper::body::{Body, Buf, Bytes};
use hyper::header::CONTENT_LENGTH;
use hyper::{HeaderMap, Method, Request, Uri};

use crate::error::ApiError;
use crate::logger;

/// Query parameters, each name mapped to every value it was given with
pub type QueryParams = HashMap<String, Vec<String>>;

/// A decoded HTTP request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub path: String,
    pub query: QueryParams,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl HttpRequest {
    /// Build a request from its already received parts
    pub fn from_parts(method: Method, uri: &Uri, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            method,
            path: uri.path().to_string(),
            query: parse_query(uri.query()),
            headers,
            body,
        }
    }

    /// Split a hyper request into its decoded head and the unread body
    ///
    /// The returned request has an empty body until [`Self::read_body`] runs.
    pub fn split<B>(req: Request<B>) -> (Self, B) {
        let (parts, body) = req.into_parts();
        let head = Self::from_parts(parts.method, &parts.uri, parts.headers, Bytes::new());
        (head, body)
    }

    /// Read a request body frame by frame
    ///
    /// A body that ends before its declared length (the client hung up)
    /// keeps the bytes that did arrive; body validation reports it as truncated.
    pub async fn read_body<B>(&mut self, mut body: B)
    where
        B: Body + Unpin,
        B::Error: Display,
    {
        let mut received = Vec::new();
        while let Some(frame) = body.frame().await {
            match frame {
                Ok(frame) => {
                    if let Ok(mut data) = frame.into_data() {
                        let chunk = data.copy_to_bytes(data.remaining());
                        received.extend_from_slice(&chunk);
                    }
                }
                Err(e) => {
                    logger::log_warning(&format!(
                        "Failed to read request body for {} {} after {} bytes: {e}",
                        self.method,
                        self.path,
                        received.len()
                    ));
                    break;
                }
            }
        }
        self.body = Bytes::from(received);
    }

    /// First value of a query parameter
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Header value as text, `None` when absent or not visible ASCII
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Declared `Content-Length`, `None` when absent
    pub fn content_length(&self) -> Result<Option<i64>, ApiError> {
        self.headers
            .get(CONTENT_LENGTH)
            .map(|v| {
                v.to_str()
                    .ok()
                    .and_then(|s| s.trim().parse::<i64>().ok())
                    .ok_or(ApiError::InvalidContentLength)
            })
            .transpose()
    }
}

/// Parse a query string into a multi-valued map, percent-decoding names and values
pub fn parse_query(query: Option<&str>) -> QueryParams {
    let mut params = QueryParams::new();
    let Some(query) = query else {
        return params;
    };

    for (name, value) in url::form_urlencoded::parse(query.as_bytes()) {
        params
            .entry(name.into_owned())
            .or_default()
            .push(value.into_owned());
    }
    params
}
