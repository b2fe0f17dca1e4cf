//! Configuration management for gchat-relay
//!
//! This module defines the main `Config` struct and its sub-structs. It uses
//! the `figment` crate to layer built-in defaults, an optional TOML file,
//! environment variables and command-line arguments, in that order.

use crate::cli::Cli;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Prefix for environment overrides, e.g. `GCHAT_RELAY_SERVER__LISTEN_ADDRESS`.
pub const ENV_PREFIX: &str = "GCHAT_RELAY_";

/// The environment variable holding the outbound webhook URL.
pub const WEBHOOK_URL_ENV: &str = "WEBHOOK_URL";

/// Errors raised while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found at specified path: {0}")]
    FileNotFound(PathBuf),

    #[error(transparent)]
    Figment(#[from] figment::Error),
}

/// The main configuration struct for the application.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// The logging level, used when `RUST_LOG` is not set.
    pub log_level: String,
    /// Configuration for the inbound HTTP server.
    pub server: ServerConfig,
    /// Configuration for the outbound chat webhook.
    pub webhook: WebhookConfig,
    /// Configuration for the Prometheus metrics endpoint.
    pub metrics: MetricsConfig,
}

/// Configuration for the inbound HTTP server.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ServerConfig {
    /// The address the alert endpoint listens on.
    pub listen_address: SocketAddr,
}

/// Configuration for the outbound chat webhook.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct WebhookConfig {
    /// The incoming webhook URL of the chat space. Empty means unset.
    #[serde(default)]
    pub url: String,
    /// Optional request timeout. Unset keeps the HTTP client's default.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

/// Configuration for the metrics endpoint.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MetricsConfig {
    /// Whether to expose `/metrics`.
    pub enabled: bool,
    /// The address the metrics server listens on.
    pub listen_address: SocketAddr,
}

impl Config {
    /// Loads the configuration, layering the sources named by `cli`.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(path) = &cli.config {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.clone()));
            }
            figment = figment.merge(Toml::file(path));
        }

        let config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            // The bare variable used by existing deployments.
            .merge(
                Env::raw()
                    .only(&[WEBHOOK_URL_ENV])
                    .map(|_| "webhook.url".into()),
            )
            .merge(cli.clone())
            .extract()?;
        Ok(config)
    }

    /// Returns `true` if an outbound webhook URL has been configured.
    pub fn has_webhook_url(&self) -> bool {
        !self.webhook.url.trim().is_empty()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: SocketAddr::from(([0, 0, 0, 0], 8080)),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_address: SocketAddr::from(([0, 0, 0, 0], 9090)),
        }
    }
}

// Provide a default implementation for tests and easy setup.
impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            server: ServerConfig::default(),
            webhook: WebhookConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}
