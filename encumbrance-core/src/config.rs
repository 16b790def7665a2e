//! Immutable encumbrance configuration threaded into every calculation.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DEFAULT_COUNT_UNEQUIPPED, DEFAULT_ENCUMBERED_THRESHOLD, DEFAULT_HEAVILY_ENCUMBERED_THRESHOLD,
    DEFAULT_MAXIMUM_THRESHOLD, LOG_TARGET,
};
use crate::settings::{SettingKey, SettingValue, SettingsSource};

/// Errors raised when encumbrance settings hold unusable values.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be a finite number (got {value})")]
    NonFinite { field: &'static str, value: f64 },
    #[error("{field} must be at least 0 (got {value:.2})")]
    Negative { field: &'static str, value: f64 },
    #[error("setting {key} expects a {expected} value (got {found})")]
    TypeMismatch {
        key: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}

/// Threshold weights in pounds, before capacity scaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncumbranceThresholds {
    #[serde(default = "EncumbranceThresholds::default_encumbered")]
    pub encumbered: f64,
    #[serde(default = "EncumbranceThresholds::default_heavily_encumbered")]
    pub heavily_encumbered: f64,
    #[serde(default = "EncumbranceThresholds::default_maximum")]
    pub maximum: f64,
}

impl EncumbranceThresholds {
    const fn default_encumbered() -> f64 {
        DEFAULT_ENCUMBERED_THRESHOLD
    }

    const fn default_heavily_encumbered() -> f64 {
        DEFAULT_HEAVILY_ENCUMBERED_THRESHOLD
    }

    const fn default_maximum() -> f64 {
        DEFAULT_MAXIMUM_THRESHOLD
    }

    #[must_use]
    pub const fn new(encumbered: f64, heavily_encumbered: f64, maximum: f64) -> Self {
        Self {
            encumbered,
            heavily_encumbered,
            maximum,
        }
    }

    /// Scale every threshold by an actor's capacity modifier.
    #[must_use]
    pub fn scaled(self, modifier: f64) -> Self {
        Self {
            encumbered: self.encumbered * modifier,
            heavily_encumbered: self.heavily_encumbered * modifier,
            maximum: self.maximum * modifier,
        }
    }

    fn fields(self) -> [(&'static str, f64); 3] {
        [
            ("encumbered threshold", self.encumbered),
            ("heavily encumbered threshold", self.heavily_encumbered),
            ("maximum threshold", self.maximum),
        ]
    }
}

impl Default for EncumbranceThresholds {
    fn default() -> Self {
        Self::new(
            Self::default_encumbered(),
            Self::default_heavily_encumbered(),
            Self::default_maximum(),
        )
    }
}

/// Host-owned encumbrance rule mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncumbranceRule {
    None,
    #[default]
    Normal,
    Variant,
}

impl EncumbranceRule {
    /// Only the variant rules apply intermediate encumbrance penalties.
    #[must_use]
    pub const fn is_variant(self) -> bool {
        matches!(self, Self::Variant)
    }
}

/// Complete encumbrance configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncumbranceConfig {
    #[serde(default)]
    pub thresholds: EncumbranceThresholds,
    #[serde(default = "EncumbranceConfig::default_count_unequipped")]
    pub count_unequipped: bool,
}

impl Default for EncumbranceConfig {
    fn default() -> Self {
        Self {
            thresholds: EncumbranceThresholds::default(),
            count_unequipped: Self::default_count_unequipped(),
        }
    }
}

impl EncumbranceConfig {
    const fn default_count_unequipped() -> bool {
        DEFAULT_COUNT_UNEQUIPPED
    }

    #[must_use]
    pub const fn with_thresholds(mut self, thresholds: EncumbranceThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    #[must_use]
    pub const fn with_count_unequipped(mut self, count_unequipped: bool) -> Self {
        self.count_unequipped = count_unequipped;
        self
    }

    /// Validate threshold values.
    ///
    /// # Errors
    ///
    /// Returns an error if any threshold is non-finite or negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in self.thresholds.fields() {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field, value });
            }
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        let t = self.thresholds;
        if t.encumbered > t.heavily_encumbered || t.heavily_encumbered > t.maximum {
            log::warn!(
                target: LOG_TARGET,
                "encumbrance thresholds are out of order: {} / {} / {}",
                t.encumbered,
                t.heavily_encumbered,
                t.maximum
            );
        }
        Ok(())
    }

    /// Build a validated configuration from registered settings. Absent keys
    /// fall back to their registered defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a setting holds the wrong type or an invalid number.
    pub fn from_settings<S>(settings: &S) -> Result<Self, ConfigError>
    where
        S: SettingsSource + ?Sized,
    {
        let config = Self {
            thresholds: EncumbranceThresholds::new(
                read_number(settings, SettingKey::EncumberedThreshold)?,
                read_number(settings, SettingKey::HeavilyEncumberedThreshold)?,
                read_number(settings, SettingKey::MaximumThreshold)?,
            ),
            count_unequipped: read_flag(settings, SettingKey::CountUnequippedItems)?,
        };
        config.validate()?;
        Ok(config)
    }
}

fn read_number<S>(settings: &S, key: SettingKey) -> Result<f64, ConfigError>
where
    S: SettingsSource + ?Sized,
{
    match settings.setting(key).unwrap_or_else(|| key.default_value()) {
        SettingValue::Number(value) => Ok(value),
        other => Err(type_mismatch(key, &other)),
    }
}

fn read_flag<S>(settings: &S, key: SettingKey) -> Result<bool, ConfigError>
where
    S: SettingsSource + ?Sized,
{
    match settings.setting(key).unwrap_or_else(|| key.default_value()) {
        SettingValue::Bool(value) => Ok(value),
        other => Err(type_mismatch(key, &other)),
    }
}

fn type_mismatch(key: SettingKey, found: &SettingValue) -> ConfigError {
    ConfigError::TypeMismatch {
        key: key.key(),
        expected: key.default_value().type_name(),
        found: found.type_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SettingsMap;

    #[test]
    fn defaults_match_registered_settings() {
        let config = EncumbranceConfig::default();
        assert!((config.thresholds.encumbered - 5.0).abs() < f64::EPSILON);
        assert!((config.thresholds.heavily_encumbered - 10.0).abs() < f64::EPSILON);
        assert!((config.thresholds.maximum - 15.0).abs() < f64::EPSILON);
        assert!(config.count_unequipped);
        assert_eq!(
            EncumbranceConfig::from_settings(&SettingsMap::default()).unwrap(),
            config
        );
    }

    #[test]
    fn validate_rejects_negative_and_nan() {
        let negative = EncumbranceConfig::default()
            .with_thresholds(EncumbranceThresholds::new(-1.0, 10.0, 15.0));
        assert_eq!(
            negative.validate(),
            Err(ConfigError::Negative {
                field: "encumbered threshold",
                value: -1.0
            })
        );
        let nan = EncumbranceConfig::default()
            .with_thresholds(EncumbranceThresholds::new(5.0, 10.0, f64::NAN));
        assert!(matches!(
            nan.validate(),
            Err(ConfigError::NonFinite {
                field: "maximum threshold",
                ..
            })
        ));
    }

    #[test]
    fn from_settings_reads_overrides_and_rejects_mismatches() {
        let mut settings = SettingsMap::default();
        settings.set(SettingKey::MaximumThreshold, SettingValue::Number(40.0));
        settings.set(SettingKey::CountUnequippedItems, SettingValue::Bool(false));
        let config = EncumbranceConfig::from_settings(&settings).unwrap();
        assert!((config.thresholds.maximum - 40.0).abs() < f64::EPSILON);
        assert!(!config.count_unequipped);

        settings.set(SettingKey::EncumberedThreshold, SettingValue::Bool(true));
        let err = EncumbranceConfig::from_settings(&settings).unwrap_err();
        assert_eq!(
            err.to_string(),
            "setting encumberedThresholdImperial expects a number value (got boolean)"
        );
    }

    #[test]
    fn string_valued_module_setting_is_a_type_mismatch() {
        let settings: SettingsMap = serde_json::from_str(
            r#"{ "core.language": "en", "countUnequippedItems": "yes" }"#,
        )
        .unwrap();
        assert_eq!(
            EncumbranceConfig::from_settings(&settings),
            Err(ConfigError::TypeMismatch {
                key: "countUnequippedItems",
                expected: "boolean",
                found: "string",
            })
        );
    }

    #[test]
    fn thresholds_scale_with_modifier() {
        let scaled = EncumbranceThresholds::default().scaled(2.0);
        assert!((scaled.encumbered - 10.0).abs() < f64::EPSILON);
        assert!((scaled.maximum - 30.0).abs() < f64::EPSILON);
        assert!(EncumbranceRule::Variant.is_variant());
        assert!(!EncumbranceRule::Normal.is_variant());
    }
}
