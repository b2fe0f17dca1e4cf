//! Delivery of formatted chat messages to the outbound webhook.
//!
//! The handler only depends on the `WebhookClient` trait from `core`, so the
//! HTTP implementation here can be swapped for a recording client in tests.
pub mod webhook;

pub use webhook::{ForwardError, HttpWebhookClient};
