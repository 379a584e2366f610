//! `POST /echo`: answers the parsed body under `received`, key order intact

use hyper::StatusCode;

use crate::http::{self, body, HttpRequest, HttpResponse};
use crate::routing::PathParams;

pub fn echo(req: &HttpRequest, _: &PathParams) -> HttpResponse {
    match body::json_object(req) {
        Ok(obj) => http::json_response(StatusCode::OK, &serde_json::json!({ "received": obj })),
        Err(e) => http::json_error(&e),
    }
}
