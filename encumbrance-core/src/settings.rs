//! Settings registry shared with the host configuration surface.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::{
    DEFAULT_COUNT_UNEQUIPPED, DEFAULT_ENCUMBERED_THRESHOLD, DEFAULT_HEAVILY_ENCUMBERED_THRESHOLD,
    DEFAULT_MAXIMUM_THRESHOLD, MODULE_ID, SETTING_COUNT_UNEQUIPPED, SETTING_ENCUMBERED_THRESHOLD,
    SETTING_HEAVILY_ENCUMBERED_THRESHOLD, SETTING_MAXIMUM_THRESHOLD, SETTING_SCOPE_WORLD,
};

/// The four options this module registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SettingKey {
    EncumberedThreshold,
    HeavilyEncumberedThreshold,
    MaximumThreshold,
    CountUnequippedItems,
}

impl SettingKey {
    pub const ALL: [Self; 4] = [
        Self::EncumberedThreshold,
        Self::HeavilyEncumberedThreshold,
        Self::MaximumThreshold,
        Self::CountUnequippedItems,
    ];

    /// Key within the module namespace.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::EncumberedThreshold => SETTING_ENCUMBERED_THRESHOLD,
            Self::HeavilyEncumberedThreshold => SETTING_HEAVILY_ENCUMBERED_THRESHOLD,
            Self::MaximumThreshold => SETTING_MAXIMUM_THRESHOLD,
            Self::CountUnequippedItems => SETTING_COUNT_UNEQUIPPED,
        }
    }

    /// Fully qualified `namespace.key` form used by host change events.
    #[must_use]
    pub fn qualified(self) -> String {
        format!("{MODULE_ID}.{}", self.key())
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key
            .strip_prefix(MODULE_ID)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(key);
        Self::ALL.into_iter().find(|candidate| candidate.key() == key)
    }

    #[must_use]
    pub const fn default_value(self) -> SettingValue {
        match self {
            Self::EncumberedThreshold => SettingValue::Number(DEFAULT_ENCUMBERED_THRESHOLD),
            Self::HeavilyEncumberedThreshold => {
                SettingValue::Number(DEFAULT_HEAVILY_ENCUMBERED_THRESHOLD)
            }
            Self::MaximumThreshold => SettingValue::Number(DEFAULT_MAXIMUM_THRESHOLD),
            Self::CountUnequippedItems => SettingValue::Bool(DEFAULT_COUNT_UNEQUIPPED),
        }
    }

    #[must_use]
    pub const fn descriptor(self) -> SettingDescriptor {
        let (name, hint) = match self {
            Self::EncumberedThreshold => (
                "Encumbered Threshold (lbs)",
                "The weight threshold for becoming encumbered in pounds.",
            ),
            Self::HeavilyEncumberedThreshold => (
                "Heavily Encumbered Threshold (lbs)",
                "The weight threshold for becoming heavily encumbered in pounds.",
            ),
            Self::MaximumThreshold => (
                "Maximum Threshold (lbs)",
                "The maximum weight a character can carry in pounds.",
            ),
            Self::CountUnequippedItems => (
                "Count Unequipped Items",
                "Whether to count the weight of unequipped items towards encumbrance.",
            ),
        };
        SettingDescriptor {
            key: self.key(),
            name,
            hint,
            scope: SETTING_SCOPE_WORLD,
            config: true,
            default: self.default_value(),
        }
    }
}

/// Registration metadata for one setting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingDescriptor {
    pub key: &'static str,
    pub name: &'static str,
    pub hint: &'static str,
    pub scope: &'static str,
    /// Shown in the host settings dialog.
    pub config: bool,
    pub default: SettingValue,
}

/// All settings this module registers, in registration order.
#[must_use]
pub fn registry() -> [SettingDescriptor; 4] {
    SettingKey::ALL.map(SettingKey::descriptor)
}

/// A stored setting value. Hosts store settings of every shape side by side;
/// anything that is not a boolean or a number lands in `Other`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Number(f64),
    Other(serde_json::Value),
}

impl SettingValue {
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::Other(serde_json::Value::String(_)) => "string",
            Self::Other(serde_json::Value::Null) => "null",
            Self::Other(serde_json::Value::Array(_)) => "array",
            Self::Other(_) => "object",
        }
    }
}

/// Read access to the host's stored settings.
pub trait SettingsSource {
    /// Current value for a key, or `None` when nothing is stored.
    fn setting(&self, key: SettingKey) -> Option<SettingValue>;
}

/// Settings stored by key, as they appear in a world snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsMap(pub BTreeMap<String, SettingValue>);

impl SettingsMap {
    pub fn set(&mut self, key: SettingKey, value: SettingValue) {
        self.0.insert(key.key().to_string(), value);
    }

    /// Entries whose keys this module does not register.
    pub fn unknown_keys(&self) -> impl Iterator<Item = &str> {
        self.0
            .keys()
            .map(String::as_str)
            .filter(|key| SettingKey::from_key(key).is_none())
    }
}

impl SettingsSource for SettingsMap {
    fn setting(&self, key: SettingKey) -> Option<SettingValue> {
        self.0
            .get(key.key())
            .or_else(|| self.0.get(&key.qualified()))
            .cloned()
    }
}
