// Configuration module entry point
// Loads startup configuration and holds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::Config;

/// Default config file name (without extension)
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// The file is optional; `CALC_*` environment variables override it,
    /// using `__` between nested keys (e.g. `CALC_SERVER__PORT=9000`).
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::load_with_env(config_path, Self::environment())
    }

    /// `CALC_` variables, `__` separating nested keys
    fn environment() -> config::Environment {
        config::Environment::with_prefix("CALC")
            .prefix_separator("_")
            .separator("__")
    }

    fn load_with_env(
        config_path: &str,
        env: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(env)
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("http.server_name", "calc_server")?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
