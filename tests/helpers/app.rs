#![allow(dead_code)]
//! Test helpers for running the full relay instance.

use anyhow::Result;
use gchat_relay::{app::App, config::Config, core::WebhookClient};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::{sync::watch, task::JoinHandle, time::timeout};

/// A running relay bound to an ephemeral local port.
#[derive(Debug)]
pub struct TestApp {
    pub addr: SocketAddr,
    pub metrics_addr: Option<SocketAddr>,
    pub shutdown_tx: watch::Sender<()>,
    pub app_handle: JoinHandle<Result<()>>,
    pub client: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// POSTs a raw body to the alert endpoint.
    pub async fn post_alert(&self, body: impl Into<reqwest::Body>) -> reqwest::Response {
        self.client
            .post(self.url("/"))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to reach the relay")
    }

    /// Shuts down the application and waits for it to terminate.
    /// Fails if the application does not shut down within the specified timeout.
    pub async fn shutdown(self, timeout_duration: Duration) -> Result<()> {
        self.shutdown_tx
            .send(())
            .expect("Failed to send shutdown signal");

        match timeout(timeout_duration, self.app_handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(anyhow::anyhow!("App failed to shut down within the timeout")),
        }
    }
}

/// A builder for creating `TestApp` instances with specific configurations.
pub struct TestAppBuilder {
    pub config: Config,
    webhook_client: Option<Arc<dyn WebhookClient>>,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        let mut config = Config::default();
        config.server.listen_address = "127.0.0.1:0".parse().unwrap();
        config.metrics.listen_address = "127.0.0.1:0".parse().unwrap();
        Self {
            config,
            webhook_client: None,
        }
    }

    /// Points the real HTTP webhook client at `url`.
    pub fn with_webhook_url(mut self, url: impl Into<String>) -> Self {
        self.config.webhook.url = url.into();
        self
    }

    pub fn with_webhook_client(mut self, client: Arc<dyn WebhookClient>) -> Self {
        self.webhook_client = Some(client);
        self
    }

    pub fn with_config_modifier(mut self, modifier: impl FnOnce(&mut Config)) -> Self {
        modifier(&mut self.config);
        self
    }

    pub async fn start(self) -> Result<TestApp> {
        let (shutdown_tx, shutdown_rx) = watch::channel(());

        let mut builder = App::builder(self.config);
        if let Some(client) = self.webhook_client {
            builder = builder.webhook_client_override(client);
        }
        let app = builder.build(shutdown_rx).await?;
        let addr = app.local_addr();
        let metrics_addr = app.metrics_addr();
        let app_handle = tokio::spawn(app.run());

        Ok(TestApp {
            addr,
            metrics_addr,
            shutdown_tx,
            app_handle,
            client: reqwest::Client::new(),
        })
    }
}
