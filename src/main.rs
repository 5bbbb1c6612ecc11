use std::sync::Arc;

use anyhow::Context;

use dexserve::config::AppConfig;
use dexserve::core::dex::DexService;
use dexserve::core::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let _log_guard = dexserve::core::logging::init();
    log::info!("{} v{} starting", dexserve::NAME, dexserve::VERSION);

    let config = AppConfig::load();
    let service = Arc::new(DexService::from_config(&config));

    // Load failures surface on the first request as well; keep serving health checks.
    match service.warm_up().await {
        Ok(count) => log::info!("Dataset ready: {} records", count),
        Err(e) => log::error!("Dataset preload failed: {}", e),
    }

    let addr = config.bind_addr();
    server::serve(addr, service, shutdown_signal())
        .await
        .with_context(|| format!("server on {addr} failed"))?;

    log::info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}
