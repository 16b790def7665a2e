//! Derived encumbrance fields written back to the host.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::constants::{STATUS_ENCUMBERED, STATUS_EXCEEDING_CAPACITY, STATUS_HEAVILY_ENCUMBERED};

/// Encumbrance status tags understood by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusTag {
    Encumbered,
    HeavilyEncumbered,
    ExceedingCarryingCapacity,
}

impl StatusTag {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Encumbered => STATUS_ENCUMBERED,
            Self::HeavilyEncumbered => STATUS_HEAVILY_ENCUMBERED,
            Self::ExceedingCarryingCapacity => STATUS_EXCEEDING_CAPACITY,
        }
    }
}

impl fmt::Display for StatusTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// At most one of each tag, ordered most severe first.
pub type StatusSet = SmallVec<[StatusTag; 3]>;

/// The `encumbrance` attribute block of an actor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncumbranceData {
    /// Carried weight, formatted with one decimal place.
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub max: f64,
    #[serde(default)]
    pub pct: f64,
    #[serde(default)]
    pub encumbered: bool,
    #[serde(default)]
    pub heavily_encumbered: bool,
    #[serde(default)]
    pub maximum: bool,
    #[serde(default)]
    pub statuses: StatusSet,
}

/// Fields persisted by the update path through the host repository.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EncumbranceUpdate {
    pub value: String,
    pub statuses: StatusSet,
}

impl EncumbranceData {
    /// Merge a persisted update into the attribute block.
    pub fn apply_update(&mut self, update: &EncumbranceUpdate) {
        self.value.clone_from(&update.value);
        self.statuses.clone_from(&update.statuses);
    }

    #[must_use]
    pub fn has_status(&self, tag: StatusTag) -> bool {
        self.statuses.contains(&tag)
    }
}
