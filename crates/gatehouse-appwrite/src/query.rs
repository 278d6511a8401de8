//! Row query filters, serialized the way the platform expects them.

use serde::Serialize;
use serde_json::Value;

/// A single query filter.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Query {
    method: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    attribute: Option<String>,
    values: Vec<Value>,
}

impl Query {
    /// Rows whose `attribute` equals `value`.
    pub fn equal(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            method: "equal",
            attribute: Some(attribute.into()),
            values: vec![value.into()],
        }
    }

    /// At most `limit` rows.
    pub fn limit(limit: u64) -> Self {
        Self {
            method: "limit",
            attribute: None,
            values: vec![limit.into()],
        }
    }

    /// Skip the first `offset` rows.
    pub fn offset(offset: u64) -> Self {
        Self {
            method: "offset",
            attribute: None,
            values: vec![offset.into()],
        }
    }

    /// The JSON string sent as one `queries[]` parameter.
    pub fn to_param(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
