//! Logger module
//!
//! Provides logging utilities for the HTTP server including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;
pub use writer::Level;

use crate::config::Config;
use crate::routing::RouteTable;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        Level::parse(&config.logging.level),
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Level applied before [`init`] has run
const FALLBACK_LEVEL: Level = Level::Info;

fn fallback_enabled(level: Level) -> bool {
    level <= FALLBACK_LEVEL
}

/// Write to info/access log
fn write_info(level: Level, message: &str) {
    match writer::get() {
        Some(w) => w.write_info(level, message),
        None if fallback_enabled(level) => println!("{message}"),
        None => {}
    }
}

/// Write to error log
fn write_error(level: Level, message: &str) {
    match writer::get() {
        Some(w) => w.write_error(level, message),
        None if fallback_enabled(level) => eprintln!("{message}"),
        None => {}
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config, routes: &RouteTable) {
    write_info(Level::Info, "======================================");
    write_info(Level::Info, "Calculator server started successfully");
    write_info(Level::Info, &format!("Listening on: http://{addr}"));
    write_info(Level::Info, &format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write_info(Level::Info, &format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(Level::Info, &format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(Level::Info, &format!("Error log: {path}"));
    }
    write_info(Level::Info, "Routes:");
    for route in routes.iter() {
        write_info(
            Level::Info,
            &format!("  - {:<5} {}", route.method.as_str(), route.pattern.as_str()),
        );
    }
    write_info(Level::Info, "Press Ctrl+C to stop");
    write_info(Level::Info, "======================================\n");
}

pub fn log_server_stopped() {
    write_info(Level::Info, "[Shutdown] Server stopped");
}

pub fn log_signal(message: &str) {
    write_info(Level::Info, &format!("[SIGNAL] {message}"));
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write_info(Level::Debug, &format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(
        Level::Error,
        &format!("[ERROR] Failed to serve connection: {err:?}"),
    );
}

pub fn log_error(message: &str) {
    write_error(Level::Error, &format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(Level::Warn, &format!("[WARN] {message}"));
}

pub fn log_headers_count(count: usize) {
    write_info(Level::Debug, &format!("[Headers] Count: {count}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    let line = entry.format(format);
    match writer::get() {
        Some(w) => w.write_access(&line),
        None => println!("{line}"),
    }
}
