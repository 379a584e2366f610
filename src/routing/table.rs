//! Route table module
//!
//! An ordered list of (method, path pattern) entries, each bound to a handler.

use hyper::Method;

use super::matcher::{PathParams, PathPattern};
use crate::http::{HttpRequest, HttpResponse};

/// Request handler signature
pub type Handler = Box<dyn Fn(&HttpRequest, &PathParams) -> HttpResponse + Send + Sync>;

/// A single route entry
pub struct Route {
    pub method: Method,
    pub pattern: PathPattern,
    handler: Handler,
}

/// Result of looking up a request in the table
pub enum Lookup<'a> {
    /// A route matched both method and path
    Found(&'a Route, PathParams),
    /// No route for this path; `method_known` tells whether any route uses the method
    NotFound { method_known: bool },
}

impl Route {
    pub fn call(&self, req: &HttpRequest, params: &PathParams) -> HttpResponse {
        (self.handler)(req, params)
    }
}

/// Routing table, built once at startup
#[derive(Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a method and path pattern
    #[must_use]
    pub fn route<F>(mut self, method: Method, pattern: &str, handler: F) -> Self
    where
        F: Fn(&HttpRequest, &PathParams) -> HttpResponse + Send + Sync + 'static,
    {
        self.routes.push(Route {
            method,
            pattern: PathPattern::parse(pattern),
            handler: Box::new(handler),
        });
        self
    }

    #[must_use]
    pub fn get<F>(self, pattern: &str, handler: F) -> Self
    where
        F: Fn(&HttpRequest, &PathParams) -> HttpResponse + Send + Sync + 'static,
    {
        self.route(Method::GET, pattern, handler)
    }

    #[must_use]
    pub fn post<F>(self, pattern: &str, handler: F) -> Self
    where
        F: Fn(&HttpRequest, &PathParams) -> HttpResponse + Send + Sync + 'static,
    {
        self.route(Method::POST, pattern, handler)
    }

    /// First route matching both the request method and path, in registration order
    pub fn lookup(&self, method: &Method, path: &str) -> Lookup<'_> {
        for route in self.routes.iter().filter(|r| r.method == *method) {
            if let Some(params) = route.pattern.matches(path) {
                return Lookup::Found(route, params);
            }
        }

        Lookup::NotFound {
            method_known: self.routes.iter().any(|r| r.method == *method),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{text_response, request::testing};
    use hyper::StatusCode;

    fn table() -> RouteTable {
        RouteTable::new()
            .get("/users/{id}", |_, params| {
                text_response(StatusCode::OK, params.get("id").unwrap_or_default().to_string())
            })
            .get("/users/me", |_, _| text_response(StatusCode::OK, "me"))
            .post("/sum", |_, _| text_response(StatusCode::OK, "sum"))
    }

    #[test]
    fn test_lookup_by_method_and_path() {
        let table = table();
        assert_eq!(table.iter().count(), 3);

        match table.lookup(&Method::GET, "/users/7") {
            Lookup::Found(route, params) => {
                assert_eq!(route.pattern.as_str(), "/users/{id}");
                assert_eq!(params.get("id"), Some("7"));
            }
            Lookup::NotFound { .. } => panic!("expected a match"),
        }

        assert!(matches!(
            table.lookup(&Method::POST, "/sum"),
            Lookup::Found(..)
        ));
    }

    #[test]
    fn test_registration_order_wins() {
        let table = table();
        match table.lookup(&Method::GET, "/users/me") {
            Lookup::Found(route, _) => assert_eq!(route.pattern.as_str(), "/users/{id}"),
            Lookup::NotFound { .. } => panic!("expected a match"),
        }
    }

    #[test]
    fn test_not_found() {
        let table = table();
        assert!(matches!(
            table.lookup(&Method::GET, "/sum"),
            Lookup::NotFound { method_known: true }
        ));
        assert!(matches!(
            table.lookup(&Method::DELETE, "/sum"),
            Lookup::NotFound {
                method_known: false
            }
        ));
    }

    #[test]
    fn test_call_handler() {
        let table = table();
        let req = testing::get("/users/9");
        let Lookup::Found(route, params) = table.lookup(&req.method, &req.path) else {
            panic!("expected a match");
        };
        assert_eq!(route.call(&req, &params).status(), StatusCode::OK);
    }
}
