//! Custom Variant Encumbrance
//!
//! Platform-agnostic encumbrance rules for character sheets: carried weight
//! under a configurable inclusion policy, capacity scaling, threshold flags and
//! metric display values. Hosts plug in through [`EncumbranceHost`] and the
//! [`DerivedDataPipeline`].

pub mod actor;
pub mod calculator;
pub mod config;
pub mod constants;
pub mod encumbrance;
pub mod item;
pub mod module;
pub mod numbers;
pub mod pipeline;
pub mod settings;
pub mod units;
pub mod weight;
pub mod world;

// Re-export commonly used types
pub use actor::{Actor, ActorId, ActorKind, ActorSize};
pub use calculator::{
    EncumbranceReport, InclusionPolicy, calculate, capacity_modifier, carried_weight,
    max_capacity,
};
pub use config::{ConfigError, EncumbranceConfig, EncumbranceRule, EncumbranceThresholds};
pub use encumbrance::{EncumbranceData, EncumbranceUpdate, StatusSet, StatusTag};
pub use item::{Inventory, Item, ItemId, ItemSystem};
pub use module::{EncumbranceHost, EncumbranceModule, HostEvent, Notification};
pub use pipeline::{
    DerivedDataPipeline, DerivedDataStep, EncumbranceStep, FnStep, PrepareContext, StepOutcome,
};
pub use settings::{SettingDescriptor, SettingKey, SettingValue, SettingsMap, SettingsSource};
pub use units::{ThresholdPair, ThresholdTable, UnitSystem, kilograms_to_pounds, pounds_to_kilograms};
pub use weight::{ItemWeight, WeightValue};
pub use world::{World, WorldError};

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Rejected;

    impl fmt::Display for Rejected {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("host rejected update")
        }
    }

    impl std::error::Error for Rejected {}

    /// Host without a threshold table whose persistence always fails.
    #[derive(Default)]
    struct ReadOnlyHost {
        actors: Vec<Actor>,
    }

    impl EncumbranceHost for ReadOnlyHost {
        type Error = Rejected;

        fn actor_ids(&self) -> Vec<ActorId> {
            self.actors.iter().map(|a| a.id.clone()).collect()
        }

        fn actor(&self, id: &ActorId) -> Option<&Actor> {
            self.actors.iter().find(|a| &a.id == id)
        }

        fn actor_mut(&mut self, id: &ActorId) -> Option<&mut Actor> {
            self.actors.iter_mut().find(|a| &a.id == id)
        }

        fn persist_encumbrance(
            &mut self,
            _id: &ActorId,
            _update: &EncumbranceUpdate,
        ) -> Result<(), Self::Error> {
            Err(Rejected)
        }

        fn sheet_rendered(&self, _id: &ActorId) -> bool {
            false
        }

        fn refresh_sheet(&mut self, _id: &ActorId) {}

        fn threshold_table(&mut self) -> Option<&mut ThresholdTable> {
            None
        }
    }

    #[test]
    fn missing_threshold_table_is_a_no_op() {
        let mut module = EncumbranceModule::new(
            ReadOnlyHost::default(),
            EncumbranceConfig::default(),
            EncumbranceRule::Variant,
        );
        assert!(!module.sync_thresholds());
        assert!(module.handle(&HostEvent::Init).unwrap().is_none());
    }

    #[test]
    fn start_surfaces_host_errors() {
        let host = ReadOnlyHost {
            actors: vec![Actor::character("a", "A")],
        };
        let err = EncumbranceModule::start(host, &SettingsMap::default(), EncumbranceRule::Normal)
            .err()
            .expect("persistence failure");
        assert_eq!(err.to_string(), "host rejected update");
    }

    #[test]
    fn start_surfaces_config_errors() {
        let mut settings = SettingsMap::default();
        settings.set(SettingKey::CountUnequippedItems, SettingValue::Number(1.0));
        let err = EncumbranceModule::start(
            ReadOnlyHost::default(),
            &settings,
            EncumbranceRule::Normal,
        )
        .err()
        .expect("type mismatch");
        assert!(err.to_string().contains("countUnequippedItems"));
    }

    #[test]
    fn groups_only_world_starts_cleanly() {
        let host = ReadOnlyHost {
            actors: vec![Actor::new("g", "Party", ActorKind::Group)],
        };
        let module =
            EncumbranceModule::start(host, &SettingsMap::default(), EncumbranceRule::Variant)
                .unwrap();
        assert_eq!(module.rule(), EncumbranceRule::Variant);
        assert!(module.config().count_unequipped);
    }
}
