//! Command-Line Interface (CLI) argument parsing.
//!
//! This module defines the command-line arguments for the relay using the
//! `clap` crate. They are merged last over the TOML file and environment
//! variables, so they take precedence over both.

use clap::Parser;
use figment::{
    value::{Dict, Map, Tag, Value},
    Error, Metadata, Profile, Provider,
};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Relays Grafana alert webhooks to a Google Chat space.
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Address the alert endpoint listens on.
    #[arg(long, value_name = "ADDR")]
    pub listen_address: Option<SocketAddr>,

    /// Google Chat incoming webhook URL (overrides WEBHOOK_URL).
    #[arg(long, value_name = "URL")]
    pub webhook_url: Option<String>,

    /// Log level, used when RUST_LOG is not set.
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Expose Prometheus metrics.
    #[arg(long)]
    pub metrics: bool,
}

impl Provider for Cli {
    fn metadata(&self) -> Metadata {
        Metadata::named("Command-Line Arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut dict = Dict::new();

        if let Some(level) = &self.log_level {
            dict.insert("log_level".into(), Value::from(level.clone()));
        }

        if let Some(addr) = self.listen_address {
            dict.insert(
                "server".into(),
                section("listen_address", Value::from(addr.to_string())),
            );
        }

        if let Some(url) = &self.webhook_url {
            dict.insert("webhook".into(), section("url", Value::from(url.clone())));
        }

        // Only an explicit flag overrides; absence keeps the lower layers.
        if self.metrics {
            dict.insert("metrics".into(), section("enabled", Value::from(true)));
        }

        let mut map = Map::new();
        map.insert(Profile::Default, dict);
        Ok(map)
    }
}

fn section(key: &str, value: Value) -> Value {
    let mut dict = Dict::new();
    dict.insert(key.to_string(), value);
    Value::Dict(Tag::Default, dict)
}
