pub mod client;
pub mod poller;

pub use client::FeedClient;
pub use poller::{PollDecision, Poller, SkipReason};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{FlapboardError, Result};

/// One named price from the feed. Order in the payload is display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub price: f64,
    /// Percent change.
    #[serde(default, deserialize_with = "lenient_number")]
    pub change: f64,
}

impl FeedItem {
    pub fn new(name: &str, price: f64, change: f64) -> Self {
        Self { name: name.to_string(), price, change }
    }
}

/// Parse a raw response body into feed items.
///
/// The body must be a JSON object with an `items` array. Entries that are
/// not objects become default items rather than failing the whole payload.
pub fn parse_payload(body: &[u8]) -> Result<Vec<FeedItem>> {
    let value: Value = serde_json::from_slice(body)?;

    let items = value
        .as_object()
        .and_then(|object| object.get("items"))
        .and_then(Value::as_array)
        .ok_or(FlapboardError::MissingItems)?;

    Ok(items
        .iter()
        .map(|item| serde_json::from_value(item.clone()).unwrap_or_default())
        .collect())
}

fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let number = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    };
    Ok(if number.is_finite() { number } else { 0.0 })
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}
