use std::sync::Arc;

mod config;
mod handler;
mod http;
mod logger;
mod routes;
mod server;
mod settings;
mod template;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;
    logger::init(&cfg)?;

    // Build the runtime with the configured worker count (CPU cores when unset)
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
    let listener = server::listener::create_reusable_listener(addr)?;

    // All request-visible state is fixed from here on
    let state = Arc::new(config::AppState::new(cfg));
    logger::log_server_start(&addr, &state.config, &state.settings);

    let signals = Arc::new(server::signal::SignalHandler::new());
    server::signal::start_signal_handler(Arc::clone(&signals));

    // LocalSet for spawn_local connection tasks
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::run(listener, state, signals))
        .await
}
