//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: route lookup, body admission
//! and reading, handler dispatch and access logging.

use std::convert::Infallible;
use std::fmt::Display;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use http_body_util::Full;
use hyper::body::{Body, Bytes, Incoming};
use hyper::header::{HeaderValue, REFERER, SERVER, USER_AGENT};
use hyper::{Method, Request, Response};

use super::{arithmetic, echo, pages};
use crate::config::AppState;
use crate::error::ApiError;
use crate::http::{self, body, HttpRequest, HttpResponse};
use crate::logger::{self, AccessLogEntry};
use crate::routing::{Lookup, PathParams, RouteTable};

/// Build the routing table served by the application
pub fn build_routes() -> RouteTable {
    RouteTable::new()
        .get("/favicon.ico", pages::favicon)
        .get("/", pages::index)
        .get("/hello", pages::hello)
        .get("/users", pages::user)
        .get("/users/{id}", pages::user)
        .get("/time", pages::time)
        .get("/sum", post_only)
        .get("/echo", post_only)
        .get("/multiply", post_only)
        .get("/divide", post_only)
        .get("/power", post_only)
        .post("/sum", arithmetic::sum)
        .post("/multiply", arithmetic::multiply)
        .post("/divide", arithmetic::divide)
        .post("/power", arithmetic::power)
        .post("/echo", echo::echo)
}

/// GET on an endpoint that only accepts POST
fn post_only(req: &HttpRequest, _: &PathParams) -> HttpResponse {
    http::method_not_allowed(req.method.as_str(), &req.path, "POST")
}

/// Route a request, reading its body only when the matched route takes one
///
/// Unrouted requests and GET routes never wait on the body. POST routes pass
/// [`body::admit`] (media type, then size limit) before the body is read.
pub async fn respond<B>(state: &AppState, req: Request<B>) -> HttpResponse
where
    B: Body + Unpin,
    B::Error: Display,
{
    let (mut request, incoming) = HttpRequest::split(req);
    let (route, params) = match state.routes.lookup(&request.method, &request.path) {
        Lookup::Found(route, params) => (route, params),
        Lookup::NotFound { method_known } => return unrouted(&request, method_known),
    };

    if route.method == Method::POST {
        if let Err(err) = body::admit(&request, state.config.http.max_body_size) {
            if matches!(err, ApiError::PayloadTooLarge { .. }) {
                logger::log_warning(&err.to_string());
            }
            return http::json_error(&err);
        }
        request.read_body(incoming).await;
    }

    route.call(&request, &params)
}

/// Unknown paths answer 404 (plain text for GET, JSON otherwise);
/// methods no route uses answer 501.
fn unrouted(req: &HttpRequest, method_known: bool) -> HttpResponse {
    if !method_known {
        return http::json_error(&ApiError::NotImplemented(req.method.to_string()));
    }

    let err = ApiError::NotFound(req.path.clone());
    if req.method == Method::GET {
        http::text_error(&err)
    } else {
        http::json_error(&err)
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<Incoming>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let access_log = state.access_log();

    let mut entry = AccessLogEntry::new(
        remote_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    if access_log {
        entry.query = req.uri().query().map(ToString::to_string);
        entry.http_version = format_version(req.version());
        entry.referer = header_string(&req, REFERER.as_str());
        entry.user_agent = header_string(&req, USER_AGENT.as_str());
    }
    logger::log_headers_count(req.headers().len());

    let mut response = respond(&state, req).await;

    if let Ok(value) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, value);
    }

    if access_log {
        entry.status = response.status().as_u16();
        entry.body_bytes = response_size(&response);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

fn header_string(req: &Request<Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn format_version(version: hyper::Version) -> String {
    match version {
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        _ => "1.1",
    }
    .to_string()
}

fn response_size(response: &HttpResponse) -> usize {
    response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::request::testing::{self, RequestBuilder};
    use crate::http::response::{JSON_CONTENT_TYPE, TEXT_CONTENT_TYPE};
    use http_body_util::BodyExt;
    use crate::config::Config;
    use hyper::header::{ALLOW, CONTENT_LENGTH, CONTENT_TYPE};
    use hyper::StatusCode;
    use serde_json::{json, Value};

    /// Route a request built without a socket, body already in place
    fn dispatch(routes: &RouteTable, req: &HttpRequest) -> HttpResponse {
        match routes.lookup(&req.method, &req.path) {
            Lookup::Found(route, params) => route.call(req, &params),
            Lookup::NotFound { method_known } => unrouted(req, method_known),
        }
    }

    fn send(req: HttpRequest) -> (StatusCode, HttpResponse) {
        let resp = dispatch(&build_routes(), &req);
        (resp.status(), resp)
    }

    async fn body_text(resp: HttpResponse) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn body_json(resp: HttpResponse) -> Value {
        assert_eq!(resp.headers()[CONTENT_TYPE], JSON_CONTENT_TYPE);
        serde_json::from_str(&body_text(resp).await).unwrap()
    }

    async fn post(path: &str, body: &str) -> (StatusCode, Value) {
        let (status, resp) = send(testing::post_json(path, body));
        (status, body_json(resp).await)
    }

    #[tokio::test]
    async fn test_index() {
        let (status, resp) = send(testing::get("/"));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], TEXT_CONTENT_TYPE);
        assert_eq!(body_text(resp).await, pages::RUNNING_MESSAGE);
    }

    #[tokio::test]
    async fn test_favicon() {
        let (status, resp) = send(testing::get("/favicon.ico"));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body_text(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_hello() {
        let (status, resp) = send(testing::get("/hello?name=Ann"));
        assert_eq!(status, StatusCode::OK);
        assert!(body_text(resp).await.contains("Ann"));

        let (status, _) = send(testing::get("/hello"));
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(testing::get("/hello?name="));
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_users() {
        let (status, resp) = send(testing::get("/users/42"));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body_json(resp).await, json!({"user_id": 42}));

        for path in ["/users/abc", "/users/", "/users"] {
            let (status, resp) = send(testing::get(path));
            assert_eq!(status, StatusCode::BAD_REQUEST, "path {path}");
            assert!(body_json(resp).await["error"].is_string());
        }

        let (status, _) = send(testing::get("/users/42/posts"));
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_time() {
        let (status, resp) = send(testing::get("/time"));
        assert_eq!(status, StatusCode::OK);
        let body = body_json(resp).await;
        let time = body["time"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(time).is_ok());
    }

    #[tokio::test]
    async fn test_get_on_post_routes() {
        for path in ["/sum", "/echo", "/multiply", "/divide", "/power"] {
            let (status, resp) = send(testing::get(path));
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "path {path}");
            assert_eq!(resp.headers()[ALLOW], "POST");
            assert!(body_json(resp).await["error"].is_string());
        }
    }

    #[tokio::test]
    async fn test_unknown_paths() {
        let (status, resp) = send(testing::get("/nowhere"));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(resp.headers()[CONTENT_TYPE], TEXT_CONTENT_TYPE);
        assert!(body_text(resp).await.contains("/nowhere"));

        let (status, body) = post("/nowhere", "{}").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("/nowhere"));

        // GET-only routes are unknown to POST
        let (status, _) = post("/", "{}").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unsupported_method() {
        let (status, resp) = send(RequestBuilder::new(Method::DELETE, "/sum").build());
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
        assert!(body_json(resp).await["error"]
            .as_str()
            .unwrap()
            .contains("DELETE"));
    }

    #[tokio::test]
    async fn test_sum() {
        let (status, body) = post("/sum", r#"{"a": 2, "b": 3}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"result": 5}));

        let (status, body) = post("/sum", r#"{"a": 1.5, "b": -0.25}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"result": 1.25}));
    }

    #[tokio::test]
    async fn test_multiply_and_power() {
        let (status, body) = post("/multiply", r#"{"a": 6, "b": 7}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"result": 42}));

        let (status, body) = post("/power", r#"{"a": 2, "b": 8}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"result": 256}));

        let (status, body) = post("/power", r#"{"a": 4, "b": -1}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"result": 0.25}));

        // no real result is still not an operand error
        let (status, body) = post("/power", r#"{"a": -8, "b": 0.5}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"result": null}));
    }

    #[tokio::test]
    async fn test_divide() {
        let (status, body) = post("/divide", r#"{"a": 7, "b": 2}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"result": 3.5}));

        for a in ["0", "5", "-3.5"] {
            let (status, body) = post("/divide", &format!(r#"{{"a": {a}, "b": 0}}"#)).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(body, json!({"error": "divisor must not be zero"}));
        }
    }

    #[tokio::test]
    async fn test_operand_errors() {
        let (status, body) = post("/sum", r#"{"a": 1}"#).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("'b'"));

        let (status, _) = post("/multiply", r#"{"a": "1", "b": 2}"#).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = post("/divide", r#"{"a": true, "b": 2}"#).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_echo() {
        let (status, body) = post("/echo", r#"{"x": 1, "y": [2,3]}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"received": {"x": 1, "y": [2, 3]}}));
    }

    #[tokio::test]
    async fn test_echo_preserves_key_order() {
        let req = testing::post_json("/echo", r#"{"z": 1, "a": {"k": null}, "m": "s"}"#);
        let resp = dispatch(&build_routes(), &req);
        assert_eq!(
            body_text(resp).await,
            r#"{"received":{"z":1,"a":{"k":null},"m":"s"}}"#
        );
    }

    #[tokio::test]
    async fn test_body_validation_statuses() {
        let req = RequestBuilder::new(Method::POST, "/sum")
            .header("content-type", "text/plain")
            .body(r#"{"a": 1, "b": 2}"#)
            .build();
        let (status, _) = send(req);
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let (status, _) = post("/echo", "[1, 2]").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = post("/sum", "{oops").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let req = RequestBuilder::new(Method::POST, "/echo")
            .header("content-type", "application/json")
            .header("content-length", "50")
            .raw_body(r#"{"x": 1}"#)
            .build();
        let (status, resp) = send(req);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body_json(resp).await["error"]
            .as_str()
            .unwrap()
            .starts_with("truncated body"));
    }

    #[tokio::test]
    async fn test_content_type_checked_before_body() {
        let req = RequestBuilder::new(Method::POST, "/divide")
            .header("content-type", "text/plain")
            .build();
        let (status, _) = send(req);
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    fn limited_state(max_body_size: u64) -> AppState {
        let mut config = Config::load_from("does/not/exist/calc_server").unwrap();
        config.http.max_body_size = max_body_size;
        AppState::new(&config, build_routes())
    }

    fn oversized(method: Method, path: &str, content_type: &str) -> Request<Full<Bytes>> {
        let body = r#"{"a": 1, "b": 2, "padding": "xxxxxxxxxxxxxxxx"}"#;
        Request::builder()
            .method(method)
            .uri(path)
            .header(CONTENT_TYPE, content_type)
            .header(CONTENT_LENGTH, body.len())
            .body(Full::new(Bytes::from(body)))
            .unwrap()
    }

    #[tokio::test]
    async fn test_size_limit_only_for_admitted_posts() {
        let state = limited_state(16);

        let resp = respond(&state, oversized(Method::POST, "/sum", "application/json")).await;
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(body_json(resp).await["error"].is_string());

        let resp = respond(&state, oversized(Method::POST, "/sum", "text/plain")).await;
        assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let resp = respond(&state, oversized(Method::GET, "/sum", "application/json")).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()[ALLOW], "POST");

        let resp = respond(&state, oversized(Method::POST, "/nowhere", "application/json")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = respond(&state, oversized(Method::PUT, "/sum", "application/json")).await;
        assert_eq!(resp.status(), StatusCode::NOT_IMPLEMENTED);
    }

    #[tokio::test]
    async fn test_respond_reads_body_within_limit() {
        let state = limited_state(1024);
        let resp = respond(&state, oversized(Method::POST, "/sum", "application/json")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, json!({"result": 3}));
    }

    #[test]
    fn test_format_version() {
        assert_eq!(format_version(hyper::Version::HTTP_10), "1.0");
        assert_eq!(format_version(hyper::Version::HTTP_11), "1.1");
    }
}
