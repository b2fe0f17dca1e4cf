/// gchat-relay - Grafana alert webhooks to Google Chat cards
///
/// This library decodes Grafana alert notifications, renders them as a
/// single Google Chat card and forwards the card to an incoming webhook.
pub mod notification;

pub mod app;
pub mod chat;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod formatting;
pub mod handler;
pub mod internal_metrics;

// Re-export core types for convenience
pub use crate::core::*;
