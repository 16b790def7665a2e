//! Item weight normalization.
//!
//! Hosts store an item's weight either as a plain number or as an object with
//! a `value` field (optionally carrying units). Anything else is accepted on
//! deserialization and normalizes to zero.
use serde::{Deserialize, Serialize};

use crate::numbers::non_negative;

/// Structured weight as stored by newer host data models.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeightValue {
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
}

/// The raw weight field of an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemWeight {
    Plain(f64),
    Structured(WeightValue),
    /// Any other shape, kept verbatim so snapshots round-trip.
    Unrecognized(serde_json::Value),
}

impl Default for ItemWeight {
    fn default() -> Self {
        Self::Unrecognized(serde_json::Value::Null)
    }
}

impl ItemWeight {
    /// Resolve the weight of a single unit. Unknown shapes, missing values and
    /// negative or non-finite numbers all resolve to zero.
    #[must_use]
    pub fn resolve(&self) -> f64 {
        match self {
            Self::Plain(value) => non_negative(*value),
            Self::Structured(WeightValue {
                value: Some(value), ..
            }) => non_negative(*value),
            Self::Structured(_) | Self::Unrecognized(_) => 0.0,
        }
    }
}

impl From<f64> for ItemWeight {
    fn from(value: f64) -> Self {
        Self::Plain(value)
    }
}
