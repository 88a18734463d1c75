//! Request and response bodies for the Bot Control Service.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `GET /api/status`.
///
/// Decoded field by field: `running` follows JSON truthiness and a count
/// that is not a number or numeric string reads as absent. Only a body that
/// is not a JSON object is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct StatusResponse {
    pub running: bool,
    /// Images collected by the bot so far. Absent or null reads as 0.
    pub image_count: Option<i64>,
}

impl TryFrom<Value> for StatusResponse {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(body) = value else {
            return Err(format!("expected a JSON object, got {value}"));
        };
        Ok(Self {
            running: body.get("running").is_some_and(truthy),
            image_count: body.get("image_count").and_then(integer),
        })
    }
}

impl StatusResponse {
    pub fn image_count(&self) -> i64 {
        self.image_count.unwrap_or(0)
    }
}

/// Body of `GET /api/logs`: newline-separated entries, each optionally
/// formatted as `timestamp - LEVELTAG - message`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogsResponse {
    pub logs: String,
}

/// Lenient view of the stored bot configuration (`GET /api/config`).
///
/// Every field is optional. Numeric fields accept JSON numbers or numeric
/// strings; anything of the wrong shape reads as absent instead of failing
/// the whole load. A non-object body reads as all-absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Value")]
pub struct RemoteConfig {
    pub email: Option<String>,
    pub password: Option<String>,
    pub group_urls: Option<Vec<String>>,
    /// Deprecated singular form, only read when `group_urls` is unusable.
    pub group_url: Option<String>,
    pub page_url: Option<String>,
    pub post_content: Option<String>,
    pub between_groups_min: Option<i64>,
    pub between_groups_max: Option<i64>,
    /// Seconds.
    pub loop_rest_min: Option<i64>,
    /// Seconds.
    pub loop_rest_max: Option<i64>,
}

impl From<Value> for RemoteConfig {
    fn from(value: Value) -> Self {
        let field = |key: &str| value.get(key);
        Self {
            email: field("email").and_then(text),
            password: field("password").and_then(text),
            group_urls: field("group_urls").and_then(text_list),
            group_url: field("group_url").and_then(text),
            page_url: field("page_url").and_then(text),
            post_content: field("post_content").and_then(text),
            between_groups_min: field("between_groups_min").and_then(integer),
            between_groups_max: field("between_groups_max").and_then(integer),
            loop_rest_min: field("loop_rest_min").and_then(integer),
            loop_rest_max: field("loop_rest_max").and_then(integer),
        }
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn text_list(value: &Value) -> Option<Vec<String>> {
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .map(|item| text(item).unwrap_or_default())
            .collect(),
    )
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Body of `POST /api/config`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigPayload {
    pub email: String,
    pub password: String,
    pub group_urls: Vec<String>,
    pub page_url: String,
    pub post_content: String,
    pub between_groups_min: i64,
    pub between_groups_max: i64,
    /// Seconds.
    pub loop_rest_min: i64,
    /// Seconds.
    pub loop_rest_max: i64,
    /// Legacy field, always 1.
    pub min_delay: i64,
    /// Legacy field, always 3.
    pub max_delay: i64,
}
