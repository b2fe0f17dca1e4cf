//! The alert relay endpoint and its shared state.

use crate::core::{Alert, WebhookClient};
use crate::error::{RelayError, Result};
use crate::formatting::MessageFormatter;
use crate::internal_metrics::Metrics;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::Response;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument};

/// State shared by every request. Nothing in it is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub formatter: Arc<dyn MessageFormatter>,
    pub webhook: Arc<dyn WebhookClient>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(
        formatter: Arc<dyn MessageFormatter>,
        webhook: Arc<dyn WebhookClient>,
        metrics: Metrics,
    ) -> Self {
        Self {
            formatter,
            webhook,
            metrics,
        }
    }
}

/// Receives a Grafana alert, forwards it as a chat card and echoes the card.
///
/// Any failure is answered with an empty `500`; nothing is retried.
#[instrument(skip_all, fields(bytes = body.len()))]
pub async fn handle_alert(State(state): State<AppState>, body: Bytes) -> Result<Response> {
    state.metrics.alerts_received_total.increment(1);

    let result = relay(&state, &body).await;
    if let Err(e) = &result {
        state.metrics.increment_failure(e.kind());
    }
    result
}

async fn relay(state: &AppState, body: &[u8]) -> Result<Response> {
    let alert = Alert::from_slice(body).map_err(RelayError::Decode)?;
    info!(
        rule_name = %alert.rule_name,
        state = %alert.state,
        dashboard_id = alert.dashboard_id,
        ?alert,
        "Received alert"
    );

    let message = state.formatter.format(&alert);
    let payload = Bytes::from(serde_json::to_vec(&message).map_err(RelayError::Serialize)?);

    let start = Instant::now();
    let response = state.webhook.forward(payload.clone()).await?;
    state
        .metrics
        .forward_duration_seconds
        .record(start.elapsed().as_secs_f64());
    state.metrics.alerts_forwarded_total.increment(1);

    info!(
        status = response.status,
        body = response.body.as_deref().unwrap_or_default(),
        "Chat webhook response"
    );

    Response::builder()
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(payload))
        .map_err(RelayError::ResponseWrite)
}

#[derive(Serialize)]
pub struct Health {
    pub status: String,
}

/// Health check endpoint.
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
    })
}
