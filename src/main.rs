use std::sync::Arc;

use tokio::sync::Notify;

mod config;
mod error;
mod handler;
mod http;
mod logger;
mod routing;
mod server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Create Tokio runtime, sized by the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let state = Arc::new(config::AppState::new(&cfg, handler::build_routes()));

    let server = server::Server::bind(addr, Arc::clone(&state))?;
    logger::log_server_start(&server.local_addr()?, &cfg, &state.routes);

    let shutdown = Arc::new(Notify::new());
    server::start_signal_handler(Arc::clone(&shutdown))?;

    // Use LocalSet for spawn_local support
    let local = tokio::task::LocalSet::new();
    local.run_until(server.serve(shutdown)).await;

    logger::log_server_stopped();
    Ok(())
}
