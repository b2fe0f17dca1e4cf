//! A mock webhook client for testing the relay without a network.

use async_trait::async_trait;
use axum::body::Bytes;
use gchat_relay::core::{ForwardResponse, WebhookClient};
use gchat_relay::notification::ForwardError;
use std::sync::{Arc, Mutex};

#[derive(Clone, Debug, Default)]
pub struct MockWebhookClient {
    pub sent_payloads: Arc<Mutex<Vec<Bytes>>>,
}

impl MockWebhookClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent_payloads(&self) -> Vec<Bytes> {
        self.sent_payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebhookClient for MockWebhookClient {
    async fn forward(&self, payload: Bytes) -> Result<ForwardResponse, ForwardError> {
        self.sent_payloads.lock().unwrap().push(payload);
        Ok(ForwardResponse {
            status: 200,
            body: Some("{}".to_string()),
        })
    }
}
