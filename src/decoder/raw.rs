//! Engine response model
//!
//! Only the parts the decoder reads are typed; everything else in a hit is
//! ignored. Missing sections default to empty. Inner hits stay untyped until
//! the decoder knows which paths it asked for.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::errors::{DecodeError, DecodeResult};

/// Search response body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawResponse {
    /// Engine-side time in milliseconds
    #[serde(default)]
    pub took: Option<u64>,
    #[serde(default)]
    pub hits: RawHits,
    #[serde(default)]
    pub aggregations: Option<Map<String, Value>>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl RawResponse {
    /// Reads a response, rejecting engine error bodies
    pub fn from_value(value: Value) -> DecodeResult<Self> {
        let response: RawResponse = serde_json::from_value(value)?;
        if let Some(error) = &response.error {
            let reason = error
                .get("reason")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(DecodeError::EngineError(reason));
        }
        Ok(response)
    }

    pub fn total(&self) -> u64 {
        self.hits.total.as_ref().map(RawTotal::value).unwrap_or(0)
    }
}

/// `hits` section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawHits {
    #[serde(default)]
    pub total: Option<RawTotal>,
    #[serde(default)]
    pub hits: Vec<RawHit>,
}

/// Hit count: a bare number or `{"value": n, ...}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawTotal {
    Count(u64),
    Object { value: u64 },
}

impl RawTotal {
    pub fn value(&self) -> u64 {
        match self {
            RawTotal::Count(n) | RawTotal::Object { value: n } => *n,
        }
    }
}

/// One hit, top-level or inner
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawHit {
    #[serde(rename = "_source", default)]
    pub source: Option<Value>,
    #[serde(default)]
    pub fields: Option<Map<String, Value>>,
    /// Nested path -> raw inner-hits section
    #[serde(default)]
    pub inner_hits: Option<Map<String, Value>>,
}

/// Inner hits for one nested path
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawInnerHits {
    #[serde(default)]
    pub hits: RawHits,
}

impl RawInnerHits {
    /// Reads one path's section; `None` when its shape is unexpected
    pub fn from_section(section: &Value) -> Option<Self> {
        RawInnerHits::deserialize(section).ok()
    }
}
