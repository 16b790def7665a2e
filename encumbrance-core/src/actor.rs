//! Actor snapshots: size, strength, capacity traits and inventory.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    CAPACITY_GARGANTUAN, CAPACITY_HUGE, CAPACITY_LARGE, CAPACITY_MEDIUM, CAPACITY_SMALL,
    CAPACITY_TINY, DEFAULT_CAPACITY_MULTIPLIER, DEFAULT_STRENGTH,
};
use crate::encumbrance::EncumbranceData;
use crate::item::{Inventory, Item, lenient_number};

/// Host identifier of an actor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub String);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActorId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Actor document type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorKind {
    #[default]
    Character,
    Npc,
    Vehicle,
    /// Parties and encounters; never carry encumbrance of their own.
    Group,
    #[serde(other)]
    Other,
}

impl ActorKind {
    /// Groups are skipped by every encumbrance path.
    #[must_use]
    pub const fn tracks_encumbrance(self) -> bool {
        !matches!(self, Self::Group)
    }

    #[must_use]
    pub const fn is_character(self) -> bool {
        matches!(self, Self::Character)
    }
}

/// Creature size category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorSize {
    Tiny,
    Sm,
    #[default]
    Med,
    Lg,
    Huge,
    Grg,
    #[serde(other)]
    Unknown,
}

impl ActorSize {
    /// Carrying capacity multiplier for this size.
    #[must_use]
    pub const fn capacity_multiplier(self) -> f64 {
        match self {
            Self::Tiny => CAPACITY_TINY,
            Self::Sm => CAPACITY_SMALL,
            Self::Med => CAPACITY_MEDIUM,
            Self::Lg => CAPACITY_LARGE,
            Self::Huge => CAPACITY_HUGE,
            Self::Grg => CAPACITY_GARGANTUAN,
            Self::Unknown => DEFAULT_CAPACITY_MULTIPLIER,
        }
    }
}

/// A character-sheet snapshot as handed over by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    #[serde(rename = "_id", alias = "id")]
    pub id: ActorId,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ActorKind,
    #[serde(default)]
    pub size: ActorSize,
    /// Strength ability score. Non-numeric scores read as absent.
    #[serde(default, deserialize_with = "lenient_number")]
    pub strength: Option<f64>,
    #[serde(default, alias = "powerfulBuild")]
    pub powerful_build: bool,
    #[serde(default)]
    pub items: Inventory,
    /// Derived encumbrance state last written by the host or this crate.
    #[serde(default)]
    pub encumbrance: EncumbranceData,
}

impl Actor {
    #[must_use]
    pub fn new(id: &str, name: &str, kind: ActorKind) -> Self {
        Self {
            id: ActorId::from(id),
            name: name.to_string(),
            kind,
            size: ActorSize::default(),
            strength: None,
            powerful_build: false,
            items: Inventory::new(),
            encumbrance: EncumbranceData::default(),
        }
    }

    #[must_use]
    pub fn character(id: &str, name: &str) -> Self {
        Self::new(id, name, ActorKind::Character)
    }

    #[must_use]
    pub fn with_size(mut self, size: ActorSize) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn with_strength(mut self, strength: f64) -> Self {
        self.strength = Some(strength);
        self
    }

    #[must_use]
    pub fn with_powerful_build(mut self, powerful_build: bool) -> Self {
        self.powerful_build = powerful_build;
        self
    }

    #[must_use]
    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    /// Strength score used for capacity. Absent, zero or invalid scores fall
    /// back to the default of 10.
    #[must_use]
    pub fn strength_score(&self) -> f64 {
        match self.strength {
            Some(score) if score.is_finite() && score > 0.0 => score,
            _ => DEFAULT_STRENGTH,
        }
    }
}
