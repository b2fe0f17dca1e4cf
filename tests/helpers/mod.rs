#![allow(dead_code)]
pub mod app;
pub mod mock_webhook;

use serde_json::{json, Value};

/// The sample notification from Grafana's webhook documentation.
pub fn grafana_alert() -> Value {
    json!({
        "dashboardId": 1,
        "evalMatches": [{ "value": 1, "metric": "Count", "tags": {} }],
        "imageUrl": "https://grafana.com/assets/img/blog/mixed_styles.png",
        "message": "Notification Message",
        "orgId": 1,
        "panelId": 2,
        "ruleId": 1,
        "ruleName": "Panel Title alert",
        "ruleUrl": "http://localhost:3000/d/hZ7BuVbWz/test-dashboard?fullscreen&edit&tab=alert&panelId=2&orgId=1",
        "state": "alerting",
        "tags": { "tag name": "tag value" },
        "title": "[Alerting] Panel Title alert"
    })
}
