//! GET endpoints
//!
//! Status page, greeting, user id echo and server time.

use chrono::{Local, SecondsFormat};
use hyper::StatusCode;

use crate::error::ApiError;
use crate::http::{self, HttpRequest, HttpResponse};
use crate::routing::PathParams;

pub const RUNNING_MESSAGE: &str = "Server is running";

/// `GET /`
pub fn index(_: &HttpRequest, _: &PathParams) -> HttpResponse {
    http::text_response(StatusCode::OK, RUNNING_MESSAGE)
}

/// `GET /favicon.ico`: there is no icon
pub fn favicon(_: &HttpRequest, _: &PathParams) -> HttpResponse {
    http::empty_response(StatusCode::NOT_FOUND)
}

/// `GET /hello?name=X`
pub fn hello(req: &HttpRequest, _: &PathParams) -> HttpResponse {
    match req.query_param("name") {
        Some(name) if !name.is_empty() => {
            http::text_response(StatusCode::OK, format!("Hello, {name}!"))
        }
        _ => http::text_error(&ApiError::MissingQueryParam("name")),
    }
}

/// `GET /users/{id}`, also registered for `/users` without an id
pub fn user(_: &HttpRequest, params: &PathParams) -> HttpResponse {
    match parse_user_id(params.get("id")) {
        Ok(id) => http::json_response(StatusCode::OK, &serde_json::json!({ "user_id": id })),
        Err(e) => http::json_error(&e),
    }
}

fn parse_user_id(raw: Option<&str>) -> Result<i64, ApiError> {
    match raw {
        None | Some("") => Err(ApiError::MissingUserId),
        Some(raw) => raw
            .parse()
            .map_err(|_| ApiError::InvalidUserId(raw.to_string())),
    }
}

/// `GET /time`: local time as ISO-8601
pub fn time(_: &HttpRequest, _: &PathParams) -> HttpResponse {
    let now = Local::now().to_rfc3339_opts(SecondsFormat::Millis, false);
    http::json_response(StatusCode::OK, &serde_json::json!({ "time": now }))
}
