//! Host hook dispatch: threshold sync, per-actor recompute and reload prompts.
use serde::{Deserialize, Serialize};

use crate::actor::{Actor, ActorId};
use crate::calculator::{InclusionPolicy, calculate};
use crate::config::{ConfigError, EncumbranceConfig, EncumbranceRule};
use crate::constants::{LOG_TARGET, MODULE_ID};
use crate::encumbrance::EncumbranceUpdate;
use crate::pipeline::{DerivedDataPipeline, PrepareContext};
use crate::settings::SettingsSource;
use crate::units::ThresholdTable;

pub const RELOAD_PROMPT: &str =
    "Changes to the encumbrance settings require a reload to take effect. Do you want to reload now?";

/// The host application as seen by the encumbrance module.
/// Platform-specific implementations own actors, sheets and persistence.
pub trait EncumbranceHost {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Ids of every actor, in host order.
    fn actor_ids(&self) -> Vec<ActorId>;

    fn actor(&self, id: &ActorId) -> Option<&Actor>;

    fn actor_mut(&mut self, id: &ActorId) -> Option<&mut Actor>;

    /// Persist encumbrance fields for an actor.
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects the update.
    fn persist_encumbrance(
        &mut self,
        id: &ActorId,
        update: &EncumbranceUpdate,
    ) -> Result<(), Self::Error>;

    fn sheet_rendered(&self, id: &ActorId) -> bool;

    /// Re-render a displayed sheet.
    fn refresh_sheet(&mut self, id: &ActorId);

    /// The host's threshold table, when the game system exposes one.
    fn threshold_table(&mut self) -> Option<&mut ThresholdTable>;
}

/// Host lifecycle events the module listens to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum HostEvent {
    Init,
    Ready,
    ActorUpdated { id: ActorId },
    SettingUpdated { key: String },
    RenderSettingsConfig,
}

/// Something the host should surface to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notification {
    /// A module setting changed; derived values elsewhere may be stale.
    ReloadRequired { key: String },
}

impl Notification {
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::ReloadRequired { .. } => RELOAD_PROMPT,
        }
    }
}

/// Encumbrance rules bound to a host.
pub struct EncumbranceModule<H>
where
    H: EncumbranceHost,
{
    host: H,
    config: EncumbranceConfig,
    rule: EncumbranceRule,
    pipeline: DerivedDataPipeline,
}

impl<H> EncumbranceModule<H>
where
    H: EncumbranceHost,
{
    #[must_use]
    pub fn new(host: H, config: EncumbranceConfig, rule: EncumbranceRule) -> Self {
        Self {
            host,
            config,
            rule,
            pipeline: DerivedDataPipeline::with_encumbrance(),
        }
    }

    /// Build the module from stored settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings hold invalid values.
    pub fn from_settings<S>(host: H, settings: &S, rule: EncumbranceRule) -> Result<Self, ConfigError>
    where
        S: SettingsSource + ?Sized,
    {
        let config = EncumbranceConfig::from_settings(settings)?;
        Ok(Self::new(host, config, rule))
    }

    /// Build the module and run the `init` and `ready` hooks.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid or the host rejects an update.
    pub fn start<S>(host: H, settings: &S, rule: EncumbranceRule) -> Result<Self, anyhow::Error>
    where
        S: SettingsSource + ?Sized,
        H::Error: Into<anyhow::Error>,
    {
        let mut module = Self::from_settings(host, settings, rule)?;
        module.handle(&HostEvent::Init).map_err(Into::<anyhow::Error>::into)?;
        module.handle(&HostEvent::Ready).map_err(Into::<anyhow::Error>::into)?;
        Ok(module)
    }

    /// Replace the host's derived-data pipeline, e.g. to put the host's own
    /// step in front of the encumbrance step.
    #[must_use]
    pub fn with_pipeline(mut self, pipeline: DerivedDataPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &EncumbranceConfig {
        &self.config
    }

    #[must_use]
    pub const fn rule(&self) -> EncumbranceRule {
        self.rule
    }

    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    pub const fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub fn into_host(self) -> H {
        self.host
    }

    /// Swap in a freshly read configuration after a reload.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings hold invalid values; the current
    /// configuration is kept in that case.
    pub fn reload<S>(&mut self, settings: &S) -> Result<(), ConfigError>
    where
        S: SettingsSource + ?Sized,
    {
        self.config = EncumbranceConfig::from_settings(settings)?;
        Ok(())
    }

    /// Dispatch one host event.
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects a persistence update.
    pub fn handle(&mut self, event: &HostEvent) -> Result<Option<Notification>, H::Error> {
        match event {
            HostEvent::Init => {
                self.sync_thresholds();
            }
            HostEvent::Ready | HostEvent::RenderSettingsConfig => {
                self.sync_thresholds();
                self.recompute_all()?;
            }
            HostEvent::ActorUpdated { id } => {
                let is_character = self
                    .host
                    .actor(id)
                    .is_some_and(|actor| actor.kind.is_character());
                if is_character {
                    self.sync_thresholds();
                    self.recompute_actor(id)?;
                }
            }
            HostEvent::SettingUpdated { key } => {
                if is_module_setting(key) {
                    log::info!(target: LOG_TARGET, "setting {key} changed; reload required");
                    return Ok(Some(Notification::ReloadRequired { key: key.clone() }));
                }
            }
        }
        Ok(None)
    }

    /// Mirror the configured thresholds into the host table in both units.
    /// Returns `false` and logs a warning when the host has no table.
    pub fn sync_thresholds(&mut self) -> bool {
        let table = ThresholdTable::from_thresholds(&self.config.thresholds);
        if let Some(target) = self.host.threshold_table() {
            *target = table;
            log::info!(target: LOG_TARGET, "Encumbrance thresholds updated successfully.");
            true
        } else {
            log::warn!(
                target: LOG_TARGET,
                "Unable to access encumbrance thresholds. Make sure the game system is properly loaded."
            );
            false
        }
    }

    /// Derived-data path for one actor: run the pipeline in place and refresh
    /// the sheet if a step asks for it. Returns `false` for unknown actors.
    pub fn prepare_derived_data(&mut self, id: &ActorId) -> bool {
        let sheet_rendered = self.host.sheet_rendered(id);
        let ctx = PrepareContext {
            config: &self.config,
            rule: self.rule,
            sheet_rendered,
        };
        let Some(actor) = self.host.actor_mut(id) else {
            log::debug!(target: LOG_TARGET, "no actor {id} to prepare");
            return false;
        };
        if self.pipeline.run(actor, &ctx) {
            self.host.refresh_sheet(id);
        }
        true
    }

    /// Update path for one actor: recompute and persist value and statuses.
    /// Unknown actors and groups are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects the update.
    pub fn recompute_actor(
        &mut self,
        id: &ActorId,
    ) -> Result<Option<EncumbranceUpdate>, H::Error> {
        let Some(actor) = self.host.actor(id) else {
            log::debug!(target: LOG_TARGET, "no actor {id} to recompute");
            return Ok(None);
        };
        let policy = InclusionPolicy::for_update(&self.config);
        let Some(report) = calculate(actor, &self.config, self.rule, policy) else {
            return Ok(None);
        };

        let update = report.to_update();
        self.host.persist_encumbrance(id, &update)?;
        log::debug!(
            target: LOG_TARGET,
            "persisted encumbrance for {id}: {} {:?}",
            update.value,
            update.statuses
        );
        if self.host.sheet_rendered(id) {
            self.host.refresh_sheet(id);
        }
        Ok(Some(update))
    }

    /// Update path for every character actor. Returns how many were updated.
    ///
    /// # Errors
    ///
    /// Returns the first error the host raises.
    pub fn recompute_all(&mut self) -> Result<usize, H::Error> {
        let characters: Vec<ActorId> = self
            .host
            .actor_ids()
            .into_iter()
            .filter(|id| {
                self.host
                    .actor(id)
                    .is_some_and(|actor| actor.kind.is_character())
            })
            .collect();
        let mut updated = 0;
        for id in &characters {
            if self.recompute_actor(id)?.is_some() {
                updated += 1;
            }
        }
        Ok(updated)
    }
}

fn is_module_setting(key: &str) -> bool {
    key.strip_prefix(MODULE_ID)
        .is_some_and(|rest| rest.starts_with('.'))
}
