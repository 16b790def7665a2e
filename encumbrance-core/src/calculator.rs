//! Carried-weight aggregation and encumbrance threshold evaluation.
//!
//! Everything here is a pure function of an actor snapshot and an immutable
//! [`EncumbranceConfig`]; callers decide where the results are written.
use serde::{Deserialize, Serialize};

use crate::actor::Actor;
use crate::config::{EncumbranceConfig, EncumbranceRule};
use crate::constants::{CARRY_CAPACITY_PER_STRENGTH, POWERFUL_BUILD_BONUS, WEIGHT_DISPLAY_PLACES};
use crate::encumbrance::{EncumbranceData, EncumbranceUpdate, StatusSet, StatusTag};
use crate::item::{Inventory, Item};
use crate::numbers::{clamp_percentage, format_fixed, non_negative};

/// Which unequipped items count toward carried weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InclusionPolicy {
    /// Equipped items, plus items inside an equipped container that does not
    /// have weightless contents.
    ContainerAware,
    /// Every item counts as if equipped.
    CountUnequipped,
}

impl InclusionPolicy {
    /// Policy used by the update path for a given configuration.
    #[must_use]
    pub const fn for_update(config: &EncumbranceConfig) -> Self {
        if config.count_unequipped {
            Self::CountUnequipped
        } else {
            Self::ContainerAware
        }
    }

    /// Whether `item` counts, given the container it resolves to (if any).
    #[must_use]
    pub fn includes(self, item: &Item, container: Option<&Item>) -> bool {
        if item.is_equipped() || matches!(self, Self::CountUnequipped) {
            return true;
        }
        container.is_some_and(|bag| bag.is_equipped() && !bag.has_weightless_contents())
    }
}

/// Sum `weight * quantity` over the items the policy includes.
#[must_use]
pub fn carried_weight(items: &Inventory, policy: InclusionPolicy) -> f64 {
    let index = items.index();
    let total: f64 = items
        .iter()
        .filter(|item| {
            let container = item
                .container_id()
                .and_then(|id| index.get(id).copied());
            policy.includes(item, container)
        })
        .map(Item::stack_weight)
        .sum();
    non_negative(total)
}

/// Size multiplier, plus one for powerful build.
#[must_use]
pub fn capacity_modifier(actor: &Actor) -> f64 {
    let base = actor.size.capacity_multiplier();
    if actor.powerful_build {
        base + POWERFUL_BUILD_BONUS
    } else {
        base
    }
}

/// `modifier * 15 * strength`.
#[must_use]
pub fn max_capacity(actor: &Actor) -> f64 {
    capacity_modifier(actor) * CARRY_CAPACITY_PER_STRENGTH * actor.strength_score()
}

/// Result of one encumbrance calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncumbranceReport {
    /// Unrounded carried weight in pounds.
    pub total_weight: f64,
    pub max: f64,
    pub pct: f64,
    pub capacity_modifier: f64,
    pub encumbered: bool,
    pub heavily_encumbered: bool,
    pub over_maximum: bool,
}

impl EncumbranceReport {
    /// Carried weight rounded to one decimal place.
    #[must_use]
    pub fn display_value(&self) -> String {
        format_fixed(self.total_weight, WEIGHT_DISPLAY_PLACES)
    }

    /// Active status tags, most severe first.
    #[must_use]
    pub fn statuses(&self) -> StatusSet {
        let mut statuses = StatusSet::new();
        if self.over_maximum {
            statuses.push(StatusTag::ExceedingCarryingCapacity);
        }
        if self.heavily_encumbered {
            statuses.push(StatusTag::HeavilyEncumbered);
        }
        if self.encumbered {
            statuses.push(StatusTag::Encumbered);
        }
        statuses
    }

    /// Full attribute block written by the derived-data path.
    #[must_use]
    pub fn to_data(&self) -> EncumbranceData {
        EncumbranceData {
            value: self.display_value(),
            max: self.max,
            pct: self.pct,
            encumbered: self.encumbered,
            heavily_encumbered: self.heavily_encumbered,
            maximum: self.over_maximum,
            statuses: self.statuses(),
        }
    }

    /// Fields persisted by the update path.
    #[must_use]
    pub fn to_update(&self) -> EncumbranceUpdate {
        EncumbranceUpdate {
            value: self.display_value(),
            statuses: self.statuses(),
        }
    }
}

/// Compute encumbrance for one actor. Groups yield `None`.
#[must_use]
pub fn calculate(
    actor: &Actor,
    config: &EncumbranceConfig,
    rule: EncumbranceRule,
    policy: InclusionPolicy,
) -> Option<EncumbranceReport> {
    if !actor.kind.tracks_encumbrance() {
        return None;
    }

    let total_weight = carried_weight(&actor.items, policy);
    let modifier = capacity_modifier(actor);
    let max = max_capacity(actor);
    let pct = clamp_percentage(total_weight / max * 100.0);
    let thresholds = config.thresholds.scaled(modifier);
    let variant = rule.is_variant();

    Some(EncumbranceReport {
        total_weight,
        max,
        pct,
        capacity_modifier: modifier,
        encumbered: variant && total_weight > thresholds.encumbered,
        heavily_encumbered: variant && total_weight > thresholds.heavily_encumbered,
        over_maximum: total_weight > thresholds.maximum,
    })
}
