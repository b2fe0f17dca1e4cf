//! The main application logic, decoupled from the entry point.

use crate::{
    config::Config,
    core::WebhookClient,
    formatting::GoogleChatFormatter,
    handler::{self, AppState},
    internal_metrics::{server::MetricsServer, MetricsBuilder},
    notification::HttpWebhookClient,
};
use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Builds the router serving the alert endpoint and the health check.
///
/// Alert bodies are not size-capped.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", post(handler::handle_alert))
        .route("/alert", post(handler::handle_alert))
        .route("/health", get(handler::health))
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}

/// A bound, ready-to-serve relay.
pub struct App {
    listener: TcpListener,
    router: Router,
    local_addr: SocketAddr,
    metrics_server: Option<MetricsServer>,
    metrics_addr: Option<SocketAddr>,
    shutdown_rx: watch::Receiver<()>,
}

impl App {
    /// Creates a new `AppBuilder` to construct an `App`.
    pub fn builder(config: Config) -> AppBuilder {
        AppBuilder::new(config)
    }

    /// The address the alert endpoint is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn metrics_addr(&self) -> Option<SocketAddr> {
        self.metrics_addr
    }

    /// Serves requests until the shutdown signal is received, then lets
    /// in-flight requests finish.
    pub async fn run(self) -> Result<()> {
        let metrics_task = self.metrics_server.map(|server| tokio::spawn(server.run()));

        let mut shutdown_rx = self.shutdown_rx;
        info!(addr = %self.local_addr, "Alert relay listening");
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown_rx.changed().await.ok();
                info!("Shutdown signal received. Draining in-flight requests...");
            })
            .await
            .context("alert server failed")?;

        if let Some(handle) = metrics_task {
            if let Err(e) = handle.await {
                error!("Metrics task panicked: {:?}", e);
            }
        }

        info!("Alert relay stopped.");
        Ok(())
    }
}

/// Builder for the main application.
///
/// Separates constructing the relay's components from running it, and lets
/// tests replace the outbound webhook client.
pub struct AppBuilder {
    config: Config,
    webhook_client_override: Option<Arc<dyn WebhookClient>>,
}

impl AppBuilder {
    /// Creates a new `AppBuilder` with the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            webhook_client_override: None,
        }
    }

    /// Overrides the outbound webhook client for testing.
    pub fn webhook_client_override(mut self, client: Arc<dyn WebhookClient>) -> Self {
        self.webhook_client_override = Some(client);
        self
    }

    /// Builds the application and binds its listeners.
    pub async fn build(self, shutdown_rx: watch::Receiver<()>) -> Result<App> {
        let webhook: Arc<dyn WebhookClient> = match self.webhook_client_override {
            Some(client) => client,
            None => {
                if !self.config.has_webhook_url() {
                    warn!("WEBHOOK_URL is not set; every alert will fail to forward");
                }
                Arc::new(
                    HttpWebhookClient::new(&self.config.webhook)
                        .context("failed to build webhook client")?,
                )
            }
        };

        let (metrics, metrics_server) =
            MetricsBuilder::new(self.config.metrics.clone()).build(shutdown_rx.clone());
        let (metrics_server, metrics_addr) = match metrics_server {
            Some((server, addr)) => {
                info!(addr = %addr, "Metrics server bound");
                (Some(server), Some(addr))
            }
            None => (None, None),
        };

        let listener = TcpListener::bind(self.config.server.listen_address)
            .await
            .with_context(|| {
                format!("failed to bind {}", self.config.server.listen_address)
            })?;
        let local_addr = listener.local_addr()?;

        let state = AppState::new(Arc::new(GoogleChatFormatter), webhook, metrics);

        Ok(App {
            listener,
            router: router(state),
            local_addr,
            metrics_server,
            metrics_addr,
            shutdown_rx,
        })
    }
}
