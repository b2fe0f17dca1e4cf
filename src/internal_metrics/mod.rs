//! # Internal Metrics Module
//!
//! Collection and exposition of relay metrics.
//!
//! ## Components:
//!
//! - **`MetricsBuilder`**: installs the Prometheus recorder, binds the
//!   metrics listener and constructs the `Metrics` handle.
//!
//! - **`Metrics`**: a cloneable handle the handler uses to record counters
//!   and latencies.
//!
//! - **`MetricsServer`**: (Defined in `server.rs`) an `axum` server exposing
//!   `/metrics` for Prometheus to scrape.

use crate::config::MetricsConfig;
use crate::internal_metrics::server::MetricsServer;
use metrics::{Counter, Histogram, Unit};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::error;

pub mod server;

/// The public API for the metrics system.
#[derive(Clone)]
pub struct Metrics {
    pub alerts_received_total: Counter,
    pub alerts_forwarded_total: Counter,
    pub forward_duration_seconds: Histogram,
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics").finish_non_exhaustive()
    }
}

impl Metrics {
    /// Creates a new `Metrics` instance and registers descriptions for all
    /// supported metrics with the global recorder.
    pub fn new() -> Self {
        metrics::describe_counter!("alerts_received_total", Unit::Count, "Total number of alert notifications received.");
        metrics::describe_counter!("alerts_forwarded_total", Unit::Count, "Total number of chat messages delivered to the webhook.");
        metrics::describe_counter!("alerts_failed_total", Unit::Count, "Total number of alert notifications that failed, labeled by kind.");
        metrics::describe_histogram!("forward_duration_seconds", Unit::Seconds, "The time taken by the outbound webhook call.");

        Self {
            alerts_received_total: metrics::counter!("alerts_received_total"),
            alerts_forwarded_total: metrics::counter!("alerts_forwarded_total"),
            forward_duration_seconds: metrics::histogram!("forward_duration_seconds"),
        }
    }

    /// Creates a `Metrics` instance that performs no operations.
    /// Used when metrics are disabled in the configuration.
    pub fn disabled() -> Self {
        Self {
            alerts_received_total: Counter::noop(),
            alerts_forwarded_total: Counter::noop(),
            forward_duration_seconds: Histogram::noop(),
        }
    }

    /// Increments the failure counter for the given error kind.
    pub fn increment_failure(&self, kind: &'static str) {
        metrics::counter!("alerts_failed_total", "kind" => kind).increment(1);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Builder for the metrics system.
pub struct MetricsBuilder {
    config: MetricsConfig,
}

impl MetricsBuilder {
    /// Creates a new `MetricsBuilder` with the given configuration.
    pub fn new(config: MetricsConfig) -> Self {
        Self { config }
    }

    /// Initializes the metrics system and returns a `Metrics` handle and an
    /// optional `MetricsServer` with its bound address.
    ///
    /// If metrics are disabled, or the recorder or listener cannot be set up,
    /// a disabled `Metrics` instance and `None` are returned.
    pub fn build(
        self,
        shutdown_rx: watch::Receiver<()>,
    ) -> (Metrics, Option<(MetricsServer, SocketAddr)>) {
        if !self.config.enabled {
            return (Metrics::disabled(), None);
        }

        let recorder = match PrometheusBuilder::new().set_buckets_for_metric(
            Matcher::Suffix("duration_seconds".to_string()),
            &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
        ) {
            Ok(builder) => builder.build_recorder(),
            Err(e) => {
                error!("Failed to configure Prometheus recorder: {}", e);
                return (Metrics::disabled(), None);
            }
        };
        let handle = recorder.handle();

        // Bind before installing the recorder so a bind failure leaves the
        // global recorder untouched.
        let listener = match std::net::TcpListener::bind(self.config.listen_address) {
            Ok(listener) => listener,
            Err(e) => {
                error!(
                    "Failed to bind metrics server to {}: {}",
                    self.config.listen_address, e
                );
                return (Metrics::disabled(), None);
            }
        };

        let (listener, addr) = match listener
            .set_nonblocking(true)
            .and_then(|_| listener.local_addr())
            .and_then(|addr| TcpListener::from_std(listener).map(|l| (l, addr)))
        {
            Ok(pair) => pair,
            Err(e) => {
                error!("Failed to prepare metrics listener: {}", e);
                return (Metrics::disabled(), None);
            }
        };

        if let Err(e) = metrics::set_global_recorder(recorder) {
            error!("Failed to install Prometheus recorder: {}", e);
            return (Metrics::disabled(), None);
        }

        let metrics = Metrics::new();
        let server = MetricsServer::new(listener, handle, shutdown_rx);

        (metrics, Some((server, addr)))
    }
}
