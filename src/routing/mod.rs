//! Routing module
//!
//! Provides the explicit (method, path pattern) → handler table:
//! - Segment-based path patterns with `{name}` captures
//! - First-match lookup in registration order

mod matcher;
mod table;

pub use matcher::{PathParams, PathPattern};
pub use table::{Lookup, RouteTable};
