use encumbrance_core::{
    ActorId, EncumbranceHost, EncumbranceModule, EncumbranceRule, HostEvent, Notification,
    SettingKey, SettingValue, StatusTag, UnitSystem, World,
};

const FIXTURE: &str = include_str!("fixtures/world.json");

fn fixture_world() -> World {
    World::from_json(FIXTURE).expect("fixture world parses")
}

fn bind_module(world: World) -> EncumbranceModule<World> {
    let settings = world.settings.clone();
    let rule = world.rule;
    EncumbranceModule::from_settings(world, &settings, rule).expect("fixture settings are valid")
}

#[test]
fn ready_recomputes_every_character_and_syncs_thresholds() {
    let mut world = fixture_world();
    world.thresholds = Some(Default::default());
    let settings = world.settings.clone();
    let module = EncumbranceModule::start(world, &settings, EncumbranceRule::Variant).unwrap();
    let world = module.into_host();

    let table = world.thresholds.expect("table present");
    let (enc, heavy, max) = table.in_units(UnitSystem::Metric);
    assert!((enc - 2.27).abs() < 1e-9);
    assert!((heavy - 4.54).abs() < 1e-9);
    assert!((max - 6.8).abs() < 1e-9);

    let hero = &world.actors[0];
    assert_eq!(hero.encumbrance.value, "13.0");
    assert_eq!(
        hero.encumbrance.statuses.as_slice(),
        &[StatusTag::HeavilyEncumbered, StatusTag::Encumbered]
    );

    let goliath = &world.actors[1];
    assert_eq!(goliath.encumbrance.value, "15.0");
    assert!(goliath.encumbrance.statuses.is_empty());

    assert!(world.actors[2].encumbrance.value.is_empty(), "groups are skipped");
    assert!(world.actors[3].encumbrance.value.is_empty(), "npcs are not batch updated");
    assert_eq!(world.refreshed, vec![ActorId::from("hero")]);
}

#[test]
fn actor_update_uses_count_unequipped_when_enabled() {
    let mut world = fixture_world();
    world
        .settings
        .set(SettingKey::CountUnequippedItems, SettingValue::Bool(true));
    let mut module = bind_module(world);

    let goliath = ActorId::from("goliath");
    let notice = module
        .handle(&HostEvent::ActorUpdated {
            id: goliath.clone(),
        })
        .unwrap();
    assert!(notice.is_none());

    let actor = module.host().actor(&goliath).unwrap();
    assert_eq!(actor.encumbrance.value, "125.0");
    assert_eq!(
        actor.encumbrance.statuses.as_slice(),
        &[
            StatusTag::ExceedingCarryingCapacity,
            StatusTag::HeavilyEncumbered,
            StatusTag::Encumbered,
        ]
    );
    assert!(module.host().refreshed.is_empty(), "goliath's sheet is closed");
}

#[test]
fn updates_for_non_characters_and_unknown_actors_are_ignored() {
    let mut module = bind_module(fixture_world());
    for id in ["party", "wolf", "nobody"] {
        module
            .handle(&HostEvent::ActorUpdated {
                id: ActorId::from(id),
            })
            .unwrap();
    }
    assert!(
        module
            .host()
            .actors
            .iter()
            .all(|actor| actor.encumbrance.value.is_empty())
    );
    assert_eq!(module.recompute_actor(&ActorId::from("nobody")).unwrap(), None);
}

#[test]
fn module_setting_changes_prompt_reload() {
    let mut module = bind_module(fixture_world());
    let notice = module
        .handle(&HostEvent::SettingUpdated {
            key: SettingKey::MaximumThreshold.qualified(),
        })
        .unwrap();
    assert_eq!(
        notice,
        Some(Notification::ReloadRequired {
            key: "custom-variant-encumbrance.maximumThresholdImperial".to_string()
        })
    );
    let other = module
        .handle(&HostEvent::SettingUpdated {
            key: "core.language".to_string(),
        })
        .unwrap();
    assert!(other.is_none());
}

#[test]
fn reload_swaps_configuration() {
    let mut module = bind_module(fixture_world());
    assert!(!module.config().count_unequipped);
    let mut settings = module.host().settings.clone();
    settings.set(SettingKey::CountUnequippedItems, SettingValue::Bool(true));
    module.reload(&settings).unwrap();
    assert!(module.config().count_unequipped);

    settings.set(SettingKey::MaximumThreshold, SettingValue::Number(-1.0));
    assert!(module.reload(&settings).is_err());
    assert!(module.config().count_unequipped, "failed reload keeps the old config");
}

#[test]
fn derived_data_path_writes_full_block_and_refreshes_open_sheet() {
    let mut module = bind_module(fixture_world());
    let hero = ActorId::from("hero");
    assert!(module.prepare_derived_data(&hero));
    let data = &module.host().actor(&hero).unwrap().encumbrance;
    assert_eq!(data.value, "13.0");
    assert!((data.max - 210.0).abs() < 1e-9);
    assert!((data.pct - 6.190_476).abs() < 1e-5);
    assert!(data.encumbered && data.heavily_encumbered && !data.maximum);
    assert_eq!(module.host().refreshed, vec![hero]);

    assert!(module.prepare_derived_data(&ActorId::from("wolf")));
    let wolf = module.host().actor(&ActorId::from("wolf")).unwrap();
    assert_eq!(wolf.encumbrance.value, "0.0");
    assert!(!module.prepare_derived_data(&ActorId::from("nobody")));
}

#[test]
fn missing_threshold_table_only_warns() {
    let mut world = fixture_world();
    world.thresholds = None;
    let mut module = bind_module(world);
    assert!(!module.sync_thresholds());
    assert_eq!(module.recompute_all().unwrap(), 2);
    assert!(module.host_mut().threshold_table().is_none());
}
