//! Inventory items and the ordered inventory an actor carries.
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::constants::WEIGHTLESS_CONTENTS_TAG;
use crate::numbers::non_negative;
use crate::weight::ItemWeight;

/// Host identifier of an item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Item fields the encumbrance rules read. Every field is optional on the wire.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ItemSystem {
    #[serde(default)]
    pub weight: ItemWeight,
    /// Non-numeric quantities read as absent.
    #[serde(default, deserialize_with = "lenient_number")]
    pub quantity: Option<f64>,
    /// Non-boolean flags read as absent.
    #[serde(default, deserialize_with = "lenient_flag")]
    pub equipped: Option<bool>,
    /// Id of the container item holding this one.
    #[serde(default)]
    pub container: Option<ItemId>,
    #[serde(default)]
    pub properties: BTreeSet<String>,
}

pub(crate) fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(serde_json::Value::as_f64))
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(serde_json::Value::as_bool))
}

/// A single inventory item snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "_id", alias = "id")]
    pub id: ItemId,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub system: ItemSystem,
}

impl Item {
    /// Create an item with no weight, quantity or flags.
    #[must_use]
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: ItemId::from(id),
            name: name.to_string(),
            kind: "loot".to_string(),
            system: ItemSystem::default(),
        }
    }

    #[must_use]
    pub fn with_weight(mut self, weight: impl Into<ItemWeight>) -> Self {
        self.system.weight = weight.into();
        self
    }

    #[must_use]
    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.system.quantity = Some(quantity);
        self
    }

    #[must_use]
    pub fn equipped(mut self, equipped: bool) -> Self {
        self.system.equipped = Some(equipped);
        self
    }

    #[must_use]
    pub fn inside(mut self, container: &str) -> Self {
        self.system.container = Some(ItemId::from(container));
        self
    }

    #[must_use]
    pub fn with_property(mut self, tag: &str) -> Self {
        self.system.properties.insert(tag.to_string());
        self
    }

    /// Weight of a single unit after normalization.
    #[must_use]
    pub fn unit_weight(&self) -> f64 {
        self.system.weight.resolve()
    }

    /// Quantity carried; absent, negative or non-finite quantities count as 0.
    #[must_use]
    pub fn quantity(&self) -> f64 {
        self.system.quantity.map_or(0.0, non_negative)
    }

    #[must_use]
    pub fn is_equipped(&self) -> bool {
        self.system.equipped.unwrap_or(false)
    }

    #[must_use]
    pub const fn container_id(&self) -> Option<&ItemId> {
        self.system.container.as_ref()
    }

    /// Whether items stored inside this one are excluded from carried weight.
    #[must_use]
    pub fn has_weightless_contents(&self) -> bool {
        self.system.properties.contains(WEIGHTLESS_CONTENTS_TAG)
    }

    /// `unit_weight * quantity`.
    #[must_use]
    pub fn stack_weight(&self) -> f64 {
        self.unit_weight() * self.quantity()
    }
}

/// Ordered collection of an actor's items.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory(pub Vec<Item>);

impl Inventory {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Find an item by id.
    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.0.iter().find(|item| &item.id == id)
    }

    /// Index items by id for repeated container lookups.
    #[must_use]
    pub fn index(&self) -> HashMap<&ItemId, &Item> {
        self.0.iter().map(|item| (&item.id, item)).collect()
    }

    pub fn push(&mut self, item: Item) {
        self.0.push(item);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.0.iter()
    }
}

impl FromIterator<Item> for Inventory {
    fn from_iter<T: IntoIterator<Item = Item>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Inventory {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_fields() {
        let item: Item = serde_json::from_str(r#"{ "_id": "rope", "name": "Rope" }"#).unwrap();
        assert!(item.quantity().abs() < f64::EPSILON);
        assert!(!item.is_equipped());
        assert!(item.container_id().is_none());
        assert!(!item.has_weightless_contents());
        assert!(item.stack_weight().abs() < f64::EPSILON);
    }

    #[test]
    fn stack_weight_multiplies_quantity() {
        let item = Item::new("arrows", "Arrows")
            .with_weight(0.05)
            .with_quantity(20.0);
        assert!((item.stack_weight() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn inventory_lookup_by_id() {
        let inventory: Inventory = [
            Item::new("bag", "Bag of Holding").with_property(WEIGHTLESS_CONTENTS_TAG),
            Item::new("gem", "Gem").inside("bag"),
        ]
        .into_iter()
        .collect();
        let gem = inventory.get(&ItemId::from("gem")).unwrap();
        let bag = inventory.get(gem.container_id().unwrap()).unwrap();
        assert!(bag.has_weightless_contents());
        assert!(inventory.get(&ItemId::from("missing")).is_none());
        assert_eq!(inventory.index().len(), 2);
    }

    #[test]
    fn malformed_quantity_and_flag_fall_back_to_defaults() {
        let item: Item = serde_json::from_str(
            r#"{ "_id": "rope", "system": { "weight": 10, "quantity": "2", "equipped": "yes" } }"#,
        )
        .unwrap();
        assert_eq!(item.system.quantity, None);
        assert!(!item.is_equipped());
        assert!(item.stack_weight().abs() < f64::EPSILON);

        let item: Item = serde_json::from_str(
            r#"{ "_id": "rope", "system": { "weight": 10, "quantity": null, "equipped": true } }"#,
        )
        .unwrap();
        assert!(item.quantity().abs() < f64::EPSILON);
        assert!(item.is_equipped());
    }

    #[test]
    fn properties_parse_from_json_arrays() {
        let item: Item = serde_json::from_str(
            r#"{ "id": "bag", "system": { "properties": ["weightlessContents", "mgc"] } }"#,
        )
        .unwrap();
        assert!(item.has_weightless_contents());
    }
}
