//! In-memory host world: actors, stored settings and rendered sheets.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::actor::{Actor, ActorId};
use crate::config::{EncumbranceRule, EncumbranceThresholds};
use crate::encumbrance::EncumbranceUpdate;
use crate::module::EncumbranceHost;
use crate::settings::SettingsMap;
use crate::units::ThresholdTable;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    #[error("actor {0} does not exist")]
    UnknownActor(ActorId),
}

/// A world snapshot, loadable from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct World {
    #[serde(default)]
    pub settings: SettingsMap,
    /// The game system's encumbrance rule mode.
    #[serde(default)]
    pub rule: EncumbranceRule,
    #[serde(default)]
    pub actors: Vec<Actor>,
    #[serde(default)]
    pub rendered_sheets: BTreeSet<ActorId>,
    /// `None` when the game system exposes no threshold table.
    #[serde(default = "World::default_thresholds")]
    pub thresholds: Option<ThresholdTable>,
    /// Sheets re-rendered since load, in order.
    #[serde(skip)]
    pub refreshed: Vec<ActorId>,
}

impl Default for World {
    fn default() -> Self {
        Self {
            settings: SettingsMap::default(),
            rule: EncumbranceRule::default(),
            actors: Vec::new(),
            rendered_sheets: BTreeSet::new(),
            thresholds: Self::default_thresholds(),
            refreshed: Vec::new(),
        }
    }
}

impl World {
    fn default_thresholds() -> Option<ThresholdTable> {
        Some(ThresholdTable::from_thresholds(
            &EncumbranceThresholds::default(),
        ))
    }

    /// Load a world snapshot from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a world.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn with_actor(mut self, actor: Actor) -> Self {
        self.actors.push(actor);
        self
    }

    /// Mark an actor's sheet as displayed.
    pub fn render_sheet(&mut self, id: &ActorId) {
        self.rendered_sheets.insert(id.clone());
    }
}

impl EncumbranceHost for World {
    type Error = WorldError;

    fn actor_ids(&self) -> Vec<ActorId> {
        self.actors.iter().map(|actor| actor.id.clone()).collect()
    }

    fn actor(&self, id: &ActorId) -> Option<&Actor> {
        self.actors.iter().find(|actor| &actor.id == id)
    }

    fn actor_mut(&mut self, id: &ActorId) -> Option<&mut Actor> {
        self.actors.iter_mut().find(|actor| &actor.id == id)
    }

    fn persist_encumbrance(
        &mut self,
        id: &ActorId,
        update: &EncumbranceUpdate,
    ) -> Result<(), Self::Error> {
        let actor = self
            .actor_mut(id)
            .ok_or_else(|| WorldError::UnknownActor(id.clone()))?;
        actor.encumbrance.apply_update(update);
        Ok(())
    }

    fn sheet_rendered(&self, id: &ActorId) -> bool {
        self.rendered_sheets.contains(id)
    }

    fn refresh_sheet(&mut self, id: &ActorId) {
        self.refreshed.push(id.clone());
    }

    fn threshold_table(&mut self) -> Option<&mut ThresholdTable> {
        self.thresholds.as_mut()
    }
}
