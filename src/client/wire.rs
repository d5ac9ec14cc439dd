//! Response bodies of the remote login service.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

/// Common `{state, msg, error, data}` envelope.
///
/// `data` stays untyped until `state` is known to be truthy, since failed
/// responses often carry `[]` or nothing there.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    #[serde(default)]
    state: Value,
    #[serde(default)]
    msg: Value,
    #[serde(default)]
    error: Value,
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    pub fn ok(&self) -> bool {
        truthy(&self.state)
    }

    /// Best human-readable reason the remote gave for a falsy `state`.
    pub fn reason(&self, fallback: &str) -> String {
        [&self.msg, &self.error]
            .into_iter()
            .find_map(|v| match v {
                Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
                Value::Null | Value::String(_) => None,
                other => Some(other.to_string()),
            })
            .unwrap_or_else(|| fallback.to_string())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenData {
    pub uid: String,
    pub time: Value,
    pub sign: String,
    pub qrcode: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusData {
    #[serde(default)]
    pub status: Value,
    #[serde(default)]
    pub msg: Value,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ResultData {
    #[serde(default)]
    pub cookie: BTreeMap<String, Value>,
}

/// The remote mixes booleans, numbers and numeric strings for flags.
pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(s.trim(), "1" | "true"),
        _ => false,
    }
}

pub(crate) fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Non-blank text of a loosely typed message field.
pub(crate) fn text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

pub(crate) fn stringify(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
