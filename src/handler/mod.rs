//! Request handler module
//!
//! Responsible for request routing dispatch and the endpoint handlers:
//! status and greeting pages, arithmetic on JSON operands, and echo.

pub mod arithmetic;
pub mod echo;
pub mod pages;
pub mod router;

// Re-export main entry point
pub use router::{build_routes, handle_request};
