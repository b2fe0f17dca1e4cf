//! gchat-relay - Grafana to Google Chat alert relay
//!
//! Receives Grafana alert webhooks over HTTP, turns each one into a Google
//! Chat card and forwards it to the configured incoming webhook.

use anyhow::Result;
use clap::Parser;
use gchat_relay::{app::App, cli::Cli, config::Config};
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(&cli).unwrap_or_else(|err| {
        // Manually initialize logging for this specific error
        tracing_subscriber::fmt().init();
        error!("Failed to load configuration: {}", err);
        std::process::exit(1);
    });

    // RUST_LOG wins over the configured level when present.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("gchat-relay starting up...");
    info!("-------------------- Configuration --------------------");
    info!("Log Level: {}", config.log_level);
    info!("Listen Address: {}", config.server.listen_address);
    info!(
        "Webhook URL: {}",
        if config.has_webhook_url() { "Configured" } else { "Not set" }
    );
    match config.webhook.timeout_ms {
        Some(timeout) => info!("Webhook Timeout: {}ms", timeout),
        None => info!("Webhook Timeout: client default"),
    }
    info!(
        "Metrics: {}",
        if config.metrics.enabled {
            format!("Enabled ({})", config.metrics.listen_address)
        } else {
            "Disabled".to_string()
        }
    );
    info!("-------------------------------------------------------");

    let (shutdown_tx, shutdown_rx) = watch::channel(());
    let app = App::builder(config).build(shutdown_rx).await?;
    let mut app_task = tokio::spawn(app.run());

    tokio::select! {
        result = &mut app_task => {
            // The server stopped on its own, which only happens on error.
            return result?;
        }
        signal = tokio::signal::ctrl_c() => signal?,
    }

    info!("Shutdown signal received. Shutting down gracefully...");
    let _ = shutdown_tx.send(());

    match app_task.await {
        Ok(result) => result?,
        Err(e) => error!("Server task panicked: {:?}", e),
    }

    info!("Exiting.");
    Ok(())
}
