//! Schema migration for deprecated configuration fields.
//!
//! Each deprecated field has one upgrade step. A step populates the current
//! field from the deprecated one when the current field is absent, and then
//! drops the deprecated value. Steps are applied in registration order and
//! are idempotent, so a config may safely pass through migration more than
//! once (e.g. once when pre-loaded, again on registration).

use crate::config::{PlanetConfig, RemoteTriggerInfo, StarSystemConfig, TornadoType};

/// Packages that predate sector-based prop unloading. Their detail props
/// are forced to stay loaded.
pub const LEGACY_KEEP_LOADED_PACKAGES: &[&str] = &[
    "CreativeNameTxt.theirhomeworld",
    "Roggsy.enterthewarioverse",
    "Jammer.jammerlore",
    "ErroneousCreationist.solarneighbourhood",
    "ErroneousCreationist.incursionfinaldawn",
];

/// Information about where a config came from, for package-specific steps.
#[derive(Debug, Clone, Copy, Default)]
pub struct MigrationContext<'a> {
    /// Unique name of the contributing package, if any.
    pub package: Option<&'a str>,
}

impl<'a> MigrationContext<'a> {
    pub fn for_package(package: &'a str) -> Self {
        Self {
            package: Some(package),
        }
    }
}

/// A single upgrade step.
pub type MigrationFn<T> = fn(&mut T, &MigrationContext<'_>);

/// A named upgrade step.
pub struct MigrationStep<T> {
    pub name: &'static str,
    pub apply: MigrationFn<T>,
}

/// Ordered list of upgrade steps for one config type.
pub struct MigrationTable<T> {
    steps: Vec<MigrationStep<T>>,
}

impl<T> MigrationTable<T> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Append a step. Steps run in the order they were registered.
    pub fn register(&mut self, name: &'static str, apply: MigrationFn<T>) {
        self.steps.push(MigrationStep { name, apply });
    }

    /// Run every step against `config`.
    pub fn run(&self, config: &mut T, ctx: &MigrationContext<'_>) {
        for step in &self.steps {
            (step.apply)(config, ctx);
        }
    }

    /// Number of registered steps.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn step_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.steps.iter().map(|s| s.name)
    }
}

impl<T> Default for MigrationTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for MigrationTable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.step_names()).finish()
    }
}

/// The system and body migration tables used by the registry.
#[derive(Debug, Default)]
pub struct Migrator {
    pub systems: MigrationTable<StarSystemConfig>,
    pub bodies: MigrationTable<PlanetConfig>,
}

impl Migrator {
    /// A migrator with every known deprecated field registered.
    pub fn standard() -> Self {
        let mut systems = MigrationTable::new();
        systems.register("coords_into_vessel", coords_into_vessel);
        systems.register("travel_audio_clip", travel_audio_clip);
        systems.register("travel_audio_file_path", travel_audio_file_path);

        let mut bodies = MigrationTable::new();
        bodies.register("prop_reveal_into_volumes", prop_reveal_into_volumes);
        bodies.register("prop_audio_volumes_into_volumes", prop_audio_volumes_into_volumes);
        bodies.register("tornado_downwards_into_type", tornado_downwards_into_type);
        bodies.register("dialogue_remote_trigger", dialogue_remote_trigger);
        bodies.register("legacy_keep_loaded", legacy_keep_loaded);

        Self { systems, bodies }
    }

    pub fn migrate_system(&self, config: &mut StarSystemConfig, ctx: &MigrationContext<'_>) {
        self.systems.run(config, ctx);
    }

    pub fn migrate_body(&self, config: &mut PlanetConfig, ctx: &MigrationContext<'_>) {
        self.bodies.run(config, ctx);
    }
}

// ---------------------------------------------------------------------------
// System steps
// ---------------------------------------------------------------------------

fn coords_into_vessel(config: &mut StarSystemConfig, _: &MigrationContext<'_>) {
    let Some(coords) = config.coords.take() else {
        return;
    };
    let vessel = config.vessel.get_or_insert_with(Default::default);
    if vessel.coords.is_none() {
        vessel.coords = Some(coords);
    }
}

fn travel_audio_clip(config: &mut StarSystemConfig, _: &MigrationContext<'_>) {
    if let Some(clip) = config.travel_audio_clip.take() {
        if config.travel_audio.is_none() {
            config.travel_audio = Some(clip);
        }
    }
}

fn travel_audio_file_path(config: &mut StarSystemConfig, _: &MigrationContext<'_>) {
    if let Some(path) = config.travel_audio_file_path.take() {
        if config.travel_audio.is_none() {
            config.travel_audio = Some(path);
        }
    }
}

// ---------------------------------------------------------------------------
// Body steps
// ---------------------------------------------------------------------------

fn prop_reveal_into_volumes(config: &mut PlanetConfig, _: &MigrationContext<'_>) {
    let Some(reveal) = config.props.as_mut().and_then(|p| p.reveal.take()) else {
        return;
    };
    let volumes = config.volumes.get_or_insert_with(Default::default);
    if volumes.reveal_volumes.is_empty() {
        volumes.reveal_volumes = reveal;
    }
}

fn prop_audio_volumes_into_volumes(config: &mut PlanetConfig, _: &MigrationContext<'_>) {
    let Some(audio) = config.props.as_mut().and_then(|p| p.audio_volumes.take()) else {
        return;
    };
    let volumes = config.volumes.get_or_insert_with(Default::default);
    if volumes.audio_volumes.is_empty() {
        volumes.audio_volumes = audio;
    }
}

fn tornado_downwards_into_type(config: &mut PlanetConfig, _: &MigrationContext<'_>) {
    let Some(props) = config.props.as_mut() else {
        return;
    };
    for tornado in &mut props.tornados {
        if tornado.downwards.take() == Some(true) && tornado.kind.is_none() {
            tornado.kind = Some(TornadoType::Downwards);
        }
    }
}

fn dialogue_remote_trigger(config: &mut PlanetConfig, _: &MigrationContext<'_>) {
    let Some(props) = config.props.as_mut() else {
        return;
    };
    for dialogue in &mut props.dialogue {
        let position = dialogue.remote_trigger_position.take();
        let radius = dialogue.remote_trigger_radius.take();
        let prereq_condition = dialogue.remote_trigger_prereq_condition.take();

        let any_set = position.is_some() || radius.is_some() || prereq_condition.is_some();
        if any_set && dialogue.remote_trigger.is_none() {
            dialogue.remote_trigger = Some(RemoteTriggerInfo {
                position,
                radius,
                prereq_condition,
            });
        }
    }
}

fn legacy_keep_loaded(config: &mut PlanetConfig, ctx: &MigrationContext<'_>) {
    let Some(package) = ctx.package else {
        return;
    };
    if !LEGACY_KEEP_LOADED_PACKAGES.contains(&package) {
        return;
    }
    if let Some(props) = config.props.as_mut() {
        for detail in &mut props.details {
            detail.keep_loaded = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        AudioVolumeInfo, DetailInfo, DialogueInfo, NomaiCoordinates, PropModule,
        RevealVolumeInfo, TornadoInfo, Vec3, VesselModule, VolumesModule,
    };

    fn ctx() -> MigrationContext<'static> {
        MigrationContext::default()
    }

    fn body_with_props(props: PropModule) -> PlanetConfig {
        PlanetConfig {
            props: Some(props),
            ..PlanetConfig::new("rock", "Alpha")
        }
    }

    #[test]
    fn table_runs_in_registration_order() {
        let mut table: MigrationTable<Vec<u8>> = MigrationTable::new();
        table.register("one", |v, _| v.push(1));
        table.register("two", |v, _| v.push(2));

        let mut data = Vec::new();
        table.run(&mut data, &ctx());
        assert_eq!(data, vec![1, 2]);
        assert_eq!(table.step_names().collect::<Vec<_>>(), vec!["one", "two"]);
    }

    #[test]
    fn standard_tables_are_populated() {
        let migrator = Migrator::standard();
        assert_eq!(migrator.systems.step_count(), 3);
        assert_eq!(migrator.bodies.step_count(), 5);
        assert_eq!(Migrator::default().bodies.step_count(), 0);
    }

    #[test]
    fn top_level_coords_move_into_vessel() {
        let coords = NomaiCoordinates::new(&[1, 2], &[3, 4], &[5, 0]);
        let mut config = StarSystemConfig {
            coords: Some(coords.clone()),
            ..Default::default()
        };
        Migrator::standard().migrate_system(&mut config, &ctx());

        assert!(config.coords.is_none());
        assert_eq!(config.vessel_coords(), Some(&coords));
    }

    #[test]
    fn deprecated_coords_do_not_override_current() {
        let current = NomaiCoordinates::new(&[0], &[1], &[2]);
        let mut config = StarSystemConfig {
            coords: Some(NomaiCoordinates::new(&[5], &[5], &[5])),
            vessel: Some(VesselModule {
                coords: Some(current.clone()),
                ..Default::default()
            }),
            ..Default::default()
        };
        Migrator::standard().migrate_system(&mut config, &ctx());
        assert_eq!(config.vessel_coords(), Some(&current));
    }

    #[test]
    fn travel_audio_prefers_clip_then_path() {
        let mut config = StarSystemConfig {
            travel_audio_clip: Some("clip".into()),
            travel_audio_file_path: Some("file.wav".into()),
            ..Default::default()
        };
        Migrator::standard().migrate_system(&mut config, &ctx());
        assert_eq!(config.travel_audio.as_deref(), Some("clip"));
        assert!(config.travel_audio_clip.is_none());
        assert!(config.travel_audio_file_path.is_none());
    }

    #[test]
    fn prop_volumes_move_into_volumes_module() {
        let mut config = body_with_props(PropModule {
            reveal: Some(vec![RevealVolumeInfo {
                reveals: vec!["FACT".into()],
                ..Default::default()
            }]),
            audio_volumes: Some(vec![AudioVolumeInfo {
                audio: "hum.wav".into(),
                ..Default::default()
            }]),
            ..Default::default()
        });
        Migrator::standard().migrate_body(&mut config, &ctx());

        let volumes = config.volumes.as_ref().unwrap();
        assert_eq!(volumes.reveal_volumes[0].reveals, vec!["FACT"]);
        assert_eq!(volumes.audio_volumes[0].audio, "hum.wav");
        let props = config.props.as_ref().unwrap();
        assert!(props.reveal.is_none());
        assert!(props.audio_volumes.is_none());
    }

    #[test]
    fn existing_volumes_are_kept() {
        let mut config = body_with_props(PropModule {
            reveal: Some(vec![RevealVolumeInfo {
                reveals: vec!["OLD".into()],
                ..Default::default()
            }]),
            ..Default::default()
        });
        config.volumes = Some(VolumesModule {
            reveal_volumes: vec![RevealVolumeInfo {
                reveals: vec!["NEW".into()],
                ..Default::default()
            }],
            ..Default::default()
        });
        Migrator::standard().migrate_body(&mut config, &ctx());
        assert_eq!(config.volumes.unwrap().reveal_volumes[0].reveals, vec!["NEW"]);
    }

    #[test]
    fn downwards_tornado_becomes_type() {
        let mut config = body_with_props(PropModule {
            tornados: vec![
                TornadoInfo {
                    downwards: Some(true),
                    ..Default::default()
                },
                TornadoInfo {
                    downwards: Some(true),
                    kind: Some(TornadoType::Hurricane),
                    ..Default::default()
                },
            ],
            ..Default::default()
        });
        Migrator::standard().migrate_body(&mut config, &ctx());

        let tornados = &config.props.as_ref().unwrap().tornados;
        assert_eq!(tornados[0].kind, Some(TornadoType::Downwards));
        assert_eq!(tornados[1].kind, Some(TornadoType::Hurricane));
        assert!(tornados.iter().all(|t| t.downwards.is_none()));
    }

    #[test]
    fn dialogue_remote_trigger_fields_are_grouped() {
        let mut config = body_with_props(PropModule {
            dialogue: vec![DialogueInfo {
                xml_file: "talk.xml".into(),
                remote_trigger_position: Some(Vec3::new(1.0, 2.0, 3.0)),
                remote_trigger_radius: Some(4.0),
                ..Default::default()
            }],
            ..Default::default()
        });
        Migrator::standard().migrate_body(&mut config, &ctx());

        let dialogue = &config.props.as_ref().unwrap().dialogue[0];
        let trigger = dialogue.remote_trigger.as_ref().unwrap();
        assert_eq!(trigger.position, Some(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(trigger.radius, Some(4.0));
        assert!(trigger.prereq_condition.is_none());
        assert!(dialogue.remote_trigger_position.is_none());
    }

    #[test]
    fn legacy_packages_keep_details_loaded() {
        let props = PropModule {
            details: vec![DetailInfo {
                path: "Prop".into(),
                ..Default::default()
            }],
            ..Default::default()
        };

        let mut legacy = body_with_props(props.clone());
        Migrator::standard()
            .migrate_body(&mut legacy, &MigrationContext::for_package("Jammer.jammerlore"));
        assert!(legacy.props.unwrap().details[0].keep_loaded);

        let mut modern = body_with_props(props);
        Migrator::standard().migrate_body(&mut modern, &MigrationContext::for_package("Some.Mod"));
        assert!(!modern.props.unwrap().details[0].keep_loaded);
    }

    #[test]
    fn migration_is_idempotent() {
        let mut config = body_with_props(PropModule {
            reveal: Some(vec![RevealVolumeInfo::default()]),
            tornados: vec![TornadoInfo {
                downwards: Some(true),
                ..Default::default()
            }],
            ..Default::default()
        });
        let migrator = Migrator::standard();
        migrator.migrate_body(&mut config, &ctx());
        let once = serde_json::to_string(&config).unwrap();
        migrator.migrate_body(&mut config, &ctx());
        let twice = serde_json::to_string(&config).unwrap();
        assert_eq!(once, twice);
    }
}
