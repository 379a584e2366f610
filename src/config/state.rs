// Application state module
// Read-only state shared by every connection

use super::types::Config;
use crate::routing::RouteTable;

/// Application state
///
/// Built once at startup and shared behind an `Arc`; nothing in it is
/// mutated while serving, so no locking is needed.
pub struct AppState {
    pub config: Config,
    pub routes: RouteTable,
}

impl AppState {
    pub fn new(config: &Config, routes: RouteTable) -> Self {
        Self {
            config: config.clone(),
            routes,
        }
    }

    pub const fn access_log(&self) -> bool {
        self.config.logging.access_log
    }
}
