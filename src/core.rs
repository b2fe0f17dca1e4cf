//! Core domain types and service traits for gchat-relay
//!
//! This module defines the inbound Grafana alert model and the trait contract
//! for the outbound webhook, the seam that tests replace with a mock.

use crate::notification::webhook::ForwardError;
use async_trait::async_trait;
use axum::body::Bytes;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

/// A single evaluation record from a Grafana alert.
///
/// Grafana sends at least `metric` and `value`, but the record is open-ended
/// (`tags` and other keys may appear), so it is kept as a raw JSON object.
pub type EvalMatch = Map<String, Value>;

/// A Grafana (legacy alerting) webhook notification.
///
/// Absent or `null` fields decode to their zero value, unknown fields are
/// ignored. A field of the wrong JSON type fails the decode. See
/// [`Alert::from_slice`] for how keys are matched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Alert {
    #[serde(deserialize_with = "null_as_default")]
    pub dashboard_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub eval_matches: Vec<EvalMatch>,
    #[serde(deserialize_with = "null_as_default")]
    pub image_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(deserialize_with = "null_as_default")]
    pub org_id: i64,
    /// Serialized as `panelID`; Grafana's own `panelId` spelling also matches.
    #[serde(rename = "panelID", deserialize_with = "null_as_default")]
    pub panel_id: i64,
    /// Serialized as `ruleID`; Grafana's own `ruleId` spelling also matches.
    #[serde(rename = "ruleID", deserialize_with = "null_as_default")]
    pub rule_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub rule_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub rule_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: HashMap<String, String>,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
}

impl Alert {
    /// Decodes an alert from a raw request body.
    ///
    /// Only the first JSON value of the body is read; anything after it is
    /// ignored. Keys match field names exactly or, failing that, ignoring
    /// ASCII case, and a repeated field takes its last non-null value. A bare
    /// `null` body decodes to the zero alert.
    pub fn from_slice(body: &[u8]) -> serde_json::Result<Self> {
        let members = match serde_json::Deserializer::from_slice(body)
            .into_iter::<Members>()
            .next()
        {
            Some(members) => members?,
            None => return Err(de::Error::custom("empty alert body")),
        };

        let mut fields = Map::new();
        for (key, value) in members.0 {
            let Some(name) = field_name(&key) else {
                continue;
            };
            if value.is_null() {
                fields.entry(name).or_insert(Value::Null);
            } else {
                fields.insert(name.to_string(), value);
            }
        }
        serde_json::from_value(Value::Object(fields))
    }

    /// Returns `true` if the alert reports the `ok` (resolved) state.
    pub fn is_ok(&self) -> bool {
        self.state == "ok"
    }
}

/// Wire names of the [`Alert`] fields.
const FIELDS: [&str; 12] = [
    "dashboardId",
    "evalMatches",
    "imageUrl",
    "message",
    "orgId",
    "panelID",
    "ruleID",
    "ruleName",
    "ruleUrl",
    "state",
    "tags",
    "title",
];

fn field_name(key: &str) -> Option<&'static str> {
    FIELDS
        .iter()
        .find(|name| **name == key)
        .or_else(|| FIELDS.iter().find(|name| name.eq_ignore_ascii_case(key)))
        .copied()
}

/// The members of a JSON object in document order, repeated keys included.
struct Members(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for Members {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MembersVisitor;

        impl<'de> Visitor<'de> for MembersVisitor {
            type Value = Members;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an alert object")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Members, E> {
                Ok(Members(Vec::new()))
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Members, A::Error> {
                let mut members = Vec::new();
                while let Some(entry) = map.next_entry::<String, Value>()? {
                    members.push(entry);
                }
                Ok(Members(members))
            }
        }

        deserializer.deserialize_any(MembersVisitor)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The outcome of a successful forward to the chat webhook.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardResponse {
    /// HTTP status returned by the chat platform.
    pub status: u16,
    /// The response body, or `None` if it could not be read.
    pub body: Option<String>,
}

// =============================================================================
// Service Traits
// =============================================================================

/// Delivers a serialized chat message to the configured webhook.
#[async_trait]
pub trait WebhookClient: Send + Sync {
    /// POSTs `payload` as `application/json` to the webhook endpoint.
    ///
    /// # Returns
    /// * `Ok(ForwardResponse)` once a response was received, whatever its status
    /// * `Err(ForwardError)` if the request could not be built or sent
    async fn forward(&self, payload: Bytes) -> Result<ForwardResponse, ForwardError>;
}
