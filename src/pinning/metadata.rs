// src/pinning/metadata.rs
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Values the pinning provider accepts in `keyvalues`
///
/// Nested structures cannot be expressed, so there is nothing to filter out
/// at send time. Integers keep their exact value on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    Bool(bool),
    Number(Number),
    Text(String),
}

impl From<&str> for TagValue {
    fn from(v: &str) -> Self {
        TagValue::Text(v.to_string())
    }
}

impl From<String> for TagValue {
    fn from(v: String) -> Self {
        TagValue::Text(v)
    }
}

impl From<bool> for TagValue {
    fn from(v: bool) -> Self {
        TagValue::Bool(v)
    }
}

/// NaN and infinities have no JSON form and are sent as text
impl From<f64> for TagValue {
    fn from(v: f64) -> Self {
        match Number::from_f64(v) {
            Some(n) => TagValue::Number(n),
            None => TagValue::Text(v.to_string()),
        }
    }
}

impl From<i64> for TagValue {
    fn from(v: i64) -> Self {
        TagValue::Number(v.into())
    }
}

impl From<u64> for TagValue {
    fn from(v: u64) -> Self {
        TagValue::Number(v.into())
    }
}

/// `pinataMetadata` form field
#[derive(Debug, Clone, Serialize)]
pub struct PinMetadata<'a> {
    pub name: &'a str,
    pub keyvalues: &'a BTreeMap<String, TagValue>,
}
