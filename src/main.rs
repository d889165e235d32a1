use log::{error, info};
use tokio::signal;

use tron_transfer_notifier::config::AppConfig;
use tron_transfer_notifier::logging::init_logging;
use tron_transfer_notifier::TransactionMonitor;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env is fine; the environment may already be populated
    let _ = dotenvy::dotenv();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            // Logging is not configured yet, so go straight to stderr
            eprintln!("Configuration error: {}", e);
            return Err(e.into());
        }
    };

    init_logging(&config.logging.level);
    info!("Starting TRON transfer notifier");

    let mut monitor = TransactionMonitor::from_config(&config).map_err(|e| {
        error!("Failed to initialize monitor: {}", e);
        e
    })?;

    tokio::select! {
        _ = monitor.run() => {}
        _ = shutdown_signal() => info!("Received shutdown signal, stopping"),
    }

    Ok(())
}

/// Resolves on Ctrl-C. If the handler cannot be installed the monitor keeps
/// running and only an external kill stops it.
async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        error!("Unable to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
}
