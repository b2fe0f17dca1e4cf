//! A client for posting chat messages to an incoming webhook.

use crate::config::WebhookConfig;
use crate::core::{ForwardResponse, WebhookClient};
use async_trait::async_trait;
use axum::body::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Errors raised while building or sending the outbound request.
#[derive(Error, Debug)]
pub enum ForwardError {
    #[error("invalid webhook URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// A `reqwest`-backed client for the configured chat webhook.
#[derive(Clone)]
pub struct HttpWebhookClient {
    webhook_url: String,
    client: reqwest::Client,
}

impl HttpWebhookClient {
    /// Creates a new `HttpWebhookClient`.
    ///
    /// The URL is not validated here, so an empty or malformed URL only fails
    /// once a message is forwarded.
    pub fn new(config: &WebhookConfig) -> Result<Self, ForwardError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout_ms) = config.timeout_ms {
            builder = builder.timeout(std::time::Duration::from_millis(timeout_ms));
        }

        Ok(Self {
            webhook_url: config.url.clone(),
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl WebhookClient for HttpWebhookClient {
    #[instrument(skip(self, payload), fields(bytes = payload.len()))]
    async fn forward(&self, payload: Bytes) -> Result<ForwardResponse, ForwardError> {
        let url = Url::parse(&self.webhook_url).map_err(|e| ForwardError::InvalidUrl {
            url: self.webhook_url.clone(),
            reason: e.to_string(),
        })?;

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await?;

        let status = response.status();
        debug!(status = %status, "Webhook responded");

        let body = match response.text().await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(error = %e, "Failed to read webhook response body");
                None
            }
        };

        Ok(ForwardResponse {
            status: status.as_u16(),
            body,
        })
    }
}
