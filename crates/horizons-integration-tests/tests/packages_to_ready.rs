//! Integration test: content packages on disk through to a ready system.
//!
//! Two packages contribute to the same system; the loader builds the
//! registry, and the manager drives the host through entering it, warping
//! elsewhere and dying.

use std::fs;
use std::path::Path;

use horizons_core::PRIMARY_SYSTEM;
use horizons_core::Registry;
use horizons_core::settings::Settings;
use horizons_core::test_utils::{cleanup, make_test_dir};
use horizons_data::{ContentLoader, discover_packages};
use horizons_runtime::gate::MAX_READY_FRAMES;
use horizons_runtime::test_utils::RecordingHost;
use horizons_runtime::{Phase, RequestOutcome, StarSystemManager, WarpSource};

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// P1 declares Alpha as the default with a rock; P2 adds a tree to Alpha
/// without a system file, plus a Beta system with a moon.
fn write_mods(mods: &Path) {
    write(mods, "P1/manifest.json", r#"{"unique_name": "A.P1"}"#);
    write(mods, "P1/systems/Alpha.json", r#"{"start_here": true}"#);
    write(mods, "P1/bodies/rock.json", r#"{"name": "rock", "star_system": "Alpha"}"#);

    write(mods, "P2/manifest.json", r#"{"unique_name": "B.P2"}"#);
    write(mods, "P2/bodies/tree.json", r#"{"name": "tree", "star_system": "Alpha"}"#);
    write(mods, "P2/systems/Beta.toml", "respawn_here = true\n");
    write(mods, "P2/planets/moon.ron", r#"(name: "moon", star_system: "Beta")"#);
}

fn load(mods: &Path) -> Registry {
    let packages = discover_packages(mods).unwrap();
    let mut registry = Registry::new();
    let reports = ContentLoader::new().load_all(&mut registry, &packages);
    assert!(reports.iter().all(|r| r.is_clean()), "{reports:?}");
    registry
}

fn finish_switch(manager: &mut StarSystemManager<RecordingHost>) {
    let scene = manager.host().last_scene_request().unwrap();
    manager.on_scene_unloaded();
    manager.on_scene_loaded(scene);
}

#[test]
fn two_packages_compose_one_system() {
    let mods = make_test_dir("it_compose");
    write_mods(&mods);
    let registry = load(&mods);

    assert_eq!(registry.effective_default(), "Alpha");
    assert_eq!(registry.body_names_of("Alpha"), vec!["rock", "tree"]);
    assert_eq!(registry.system("Alpha").unwrap().package_name(), Some("A.P1"));

    let mut manager = StarSystemManager::new(registry, RecordingHost::new());
    manager.reset_to_default();
    finish_switch(&mut manager);
    assert_eq!(manager.host().built_in("Alpha"), vec!["rock", "tree"]);
    cleanup(&mods);
}

#[test]
fn idle_to_beta_and_back() {
    let mods = make_test_dir("it_beta");
    write_mods(&mods);
    let mut manager = StarSystemManager::new(load(&mods), RecordingHost::new());

    // Idle -> Preparing with the requested target.
    assert_eq!(
        manager.request_system_change("Beta", WarpSource::None),
        RequestOutcome::Accepted
    );
    assert_eq!(manager.phase(), Phase::Preparing);
    assert_eq!(manager.machine().pending_target(), Some("Beta"));

    // Scene switch completes -> ActiveNotReady.
    finish_switch(&mut manager);
    assert_eq!(manager.phase(), Phase::ActiveNotReady);
    assert_eq!(manager.previous_system_id(), Some("Alpha"));
    assert_eq!(manager.host().built_in("Beta"), vec!["moon"]);

    // Predicate true -> ActiveReady.
    manager.host_mut().avatar_ready = true;
    assert_eq!(manager.advance(), Phase::ActiveReady);

    // Beta respawns in place.
    assert_eq!(manager.on_player_death(), None);

    // Warp back with loop time running; it is restored exactly once.
    manager.host_mut().loop_seconds = 90.0;
    manager.request_system_change("Alpha", WarpSource::Vessel);
    finish_switch(&mut manager);
    assert_eq!(manager.previous_system_id(), Some("Beta"));
    assert_eq!(manager.host().restored_seconds, vec![90.0]);
    manager.on_scene_unloaded();
    manager.on_scene_loaded(horizons_runtime::SceneKind::SolarSystem);
    assert_eq!(manager.host().restored_seconds, vec![90.0]);
    cleanup(&mods);
}

#[test]
fn readiness_forced_after_exactly_the_bound() {
    let mods = make_test_dir("it_bound");
    write_mods(&mods);
    let mut manager = StarSystemManager::new(load(&mods), RecordingHost::new());
    manager.reset_to_default();
    finish_switch(&mut manager);

    let mut frames = 0;
    while manager.advance() != Phase::ActiveReady {
        frames += 1;
        assert!(frames < MAX_READY_FRAMES, "gate never opened");
    }
    assert_eq!(frames + 1, MAX_READY_FRAMES);
    cleanup(&mods);
}

#[test]
fn second_request_in_flight_does_not_change_target() {
    let mods = make_test_dir("it_single");
    write_mods(&mods);
    let mut manager = StarSystemManager::new(load(&mods), RecordingHost::new());
    manager.reset_to_default();
    finish_switch(&mut manager);
    manager.signal_ready();

    manager.request_system_change("Beta", WarpSource::Ship);
    assert_eq!(
        manager.request_system_change(PRIMARY_SYSTEM, WarpSource::None),
        RequestOutcome::Dropped
    );
    finish_switch(&mut manager);
    assert_eq!(manager.current_system_id(), "Beta");
    cleanup(&mods);
}

#[test]
fn death_in_alpha_resets_to_override() {
    let mods = make_test_dir("it_death");
    write_mods(&mods);
    let mut manager = StarSystemManager::new(load(&mods), RecordingHost::new());
    manager.reset_to_default();
    finish_switch(&mut manager);
    manager.signal_ready();

    manager.configure(Settings {
        default_system_override: Some("Beta".into()),
        ..Default::default()
    });
    assert_eq!(manager.current_system_id(), "Alpha");

    assert_eq!(manager.on_player_death(), Some(RequestOutcome::Accepted));
    finish_switch(&mut manager);
    assert_eq!(manager.current_system_id(), "Beta");
    assert_eq!(manager.machine().arrived_by(), WarpSource::Ship);
    cleanup(&mods);
}

#[test]
fn broken_file_reported_and_rest_still_builds() {
    let mods = make_test_dir("it_broken");
    write_mods(&mods);
    write(&mods, "P1/bodies/broken.json", "{ not json");

    let packages = discover_packages(&mods).unwrap();
    let mut registry = Registry::new();
    let mut loader = ContentLoader::new();
    loader.load_all(&mut registry, &packages);
    assert_eq!(loader.diagnostics().failed_file_names(), vec!["bodies/broken.json"]);

    let mut manager = StarSystemManager::new(registry, RecordingHost::new());
    manager.reset_to_default();
    finish_switch(&mut manager);
    assert_eq!(manager.host().built_in("Alpha"), vec!["rock", "tree"]);
    cleanup(&mods);
}

#[test]
fn primary_redeclared_later_does_not_steal_default() {
    let mods = make_test_dir("it_default");
    write_mods(&mods);
    write(&mods, "P3/manifest.json", r#"{"unique_name": "C.P3"}"#);
    write(&mods, &format!("P3/systems/{PRIMARY_SYSTEM}.json"), r#"{"start_here": true}"#);
    write(&mods, "P3/bodies/ghost_rock.json", r#"{"name": "ghost_rock", "star_system": "Ghost"}"#);

    let registry = load(&mods);
    assert_eq!(registry.effective_default(), "Alpha");
    assert_eq!(registry.body_names_of("Ghost"), vec!["ghost_rock"]);
    assert!(!registry.system("Ghost").unwrap().config.starts_here());
    cleanup(&mods);
}
