//! Imperial/metric conversion of display thresholds.
//!
//! Comparisons always happen in pounds; kilogram values exist for display only.
use serde::{Deserialize, Serialize};

use crate::config::EncumbranceThresholds;
use crate::constants::{LBS_PER_KG, METRIC_DISPLAY_PLACES};
use crate::numbers::round_to_places;

/// Unit system used for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Imperial,
    Metric,
}

impl UnitSystem {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Imperial => "lbs",
            Self::Metric => "kg",
        }
    }
}

/// Convert pounds to kilograms, rounded to two decimals.
#[must_use]
pub fn pounds_to_kilograms(pounds: f64) -> f64 {
    round_to_places(pounds / LBS_PER_KG, METRIC_DISPLAY_PLACES)
}

#[must_use]
pub fn kilograms_to_pounds(kilograms: f64) -> f64 {
    kilograms * LBS_PER_KG
}

/// One threshold in both unit systems.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ThresholdPair {
    pub imperial: f64,
    pub metric: f64,
}

impl ThresholdPair {
    #[must_use]
    pub fn from_pounds(pounds: f64) -> Self {
        Self {
            imperial: pounds,
            metric: pounds_to_kilograms(pounds),
        }
    }

    #[must_use]
    pub const fn in_units(self, units: UnitSystem) -> f64 {
        match units {
            UnitSystem::Imperial => self.imperial,
            UnitSystem::Metric => self.metric,
        }
    }
}

/// Host-side threshold table, mirroring the configured thresholds in both units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdTable {
    pub encumbered: ThresholdPair,
    pub heavily_encumbered: ThresholdPair,
    pub maximum: ThresholdPair,
}

impl ThresholdTable {
    #[must_use]
    pub fn from_thresholds(thresholds: &EncumbranceThresholds) -> Self {
        Self {
            encumbered: ThresholdPair::from_pounds(thresholds.encumbered),
            heavily_encumbered: ThresholdPair::from_pounds(thresholds.heavily_encumbered),
            maximum: ThresholdPair::from_pounds(thresholds.maximum),
        }
    }

    /// `(encumbered, heavily encumbered, maximum)` in the requested units.
    #[must_use]
    pub const fn in_units(&self, units: UnitSystem) -> (f64, f64, f64) {
        (
            self.encumbered.in_units(units),
            self.heavily_encumbered.in_units(units),
            self.maximum.in_units(units),
        )
    }
}
