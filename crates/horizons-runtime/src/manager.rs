//! The star system manager: drives the transition machine against a host.

use tracing::{debug, error, info, warn};

use horizons_core::diagnostics::{Diagnostics, FailedConfig, FailureKind};
use horizons_core::settings::Settings;
use horizons_core::{BodyId, EYE_SYSTEM, PRIMARY_SYSTEM, Registry, RuntimeHandle};

use crate::error::BuildError;
use crate::event::{EventBus, SystemEvent};
use crate::gate::MAX_READY_FRAMES;
use crate::host::{Host, SceneKind, SystemContext};
use crate::transition::{Phase, RequestOutcome, TransitionMachine, WarpSource};

/// Owns the registry and sequences every system change.
///
/// The host calls [`on_scene_loaded`](Self::on_scene_loaded),
/// [`on_scene_unloaded`](Self::on_scene_unloaded) and
/// [`advance`](Self::advance) (once per frame); everything else is driven
/// by gameplay code.
pub struct StarSystemManager<H: Host> {
    registry: Registry,
    machine: TransitionMachine,
    events: EventBus,
    host: H,
    settings: Settings,
    /// Bodies that failed to build.
    diagnostics: Diagnostics,
    max_ready_frames: u32,
    /// The scene the host last finished loading, until it is unloaded.
    scene: Option<SceneKind>,
    configured: bool,
}

impl<H: Host + std::fmt::Debug> std::fmt::Debug for StarSystemManager<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StarSystemManager")
            .field("machine", &self.machine)
            .field("host", &self.host)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl<H: Host> StarSystemManager<H> {
    /// Start idle, with the registry's effective default as current system.
    pub fn new(registry: Registry, host: H) -> Self {
        let machine = TransitionMachine::new(registry.effective_default());
        Self {
            registry,
            machine,
            events: EventBus::default(),
            host,
            settings: Settings::default(),
            diagnostics: Diagnostics::new(),
            max_ready_frames: MAX_READY_FRAMES,
            scene: None,
            configured: false,
        }
    }

    /// Override the readiness frame bound.
    pub fn with_max_ready_frames(mut self, frames: u32) -> Self {
        self.max_ready_frames = frames;
        self
    }

    /// Apply new settings.
    ///
    /// If the default-system override changed while idle, the current
    /// system moves to the new effective default. While a system is running
    /// the new override takes effect on the next reset.
    ///
    /// Toggling the custom title screen while it is showing reloads the
    /// title scene. The first call never reloads.
    pub fn configure(&mut self, settings: Settings) {
        let title_changed = settings.custom_title_screen != self.settings.custom_title_screen;
        let override_id = settings.override_id().map(str::to_string);
        let changed = self.registry.defaults_mut().set_override(override_id);
        self.settings = settings;

        if title_changed && self.configured && self.scene == Some(SceneKind::Title) {
            debug!("title screen setting changed; reloading title");
            self.host.request_scene_switch(SceneKind::Title);
        }
        self.configured = true;

        if !changed {
            return;
        }
        if let Some(id) = self.registry.defaults().override_id() {
            if !self.registry.override_active() {
                error!(system = id, "default system override names no known system");
            }
        }
        if self.machine.phase() == Phase::Idle {
            let default = self.registry.effective_default().to_string();
            info!(system = default.as_str(), "default system changed");
            self.machine.redirect_current(&default);
        } else {
            debug!("default system override will apply on the next reset");
        }
    }

    // -----------------------------------------------------------------------
    // Change requests
    // -----------------------------------------------------------------------

    /// Ask to move to `target`, arriving by `warp`.
    ///
    /// Loop time is carried over when the current system runs the time loop
    /// and some time has elapsed. An unknown target is replaced by the
    /// effective default.
    pub fn request_system_change(&mut self, target: &str, warp: WarpSource) -> RequestOutcome {
        let carry = if self.machine.phase().is_active() && self.time_loop_enabled(self.machine.current()) {
            Some(self.host.loop_seconds_elapsed()).filter(|s| *s > 0.0)
        } else {
            None
        };
        self.request_change_with(target, warp, carry)
    }

    fn request_change_with(&mut self, target: &str, warp: WarpSource, carry: Option<f32>) -> RequestOutcome {
        let target = if self.registry.contains_system(target) {
            target.to_string()
        } else {
            let fallback = self.registry.effective_default().to_string();
            error!(
                system = target,
                fallback = fallback.as_str(),
                "requested system does not exist; using default instead"
            );
            fallback
        };

        let outcome = self.machine.request_change(&target, warp, carry);
        if outcome.is_accepted() {
            let from = self.machine.current().to_string();
            info!(from = from.as_str(), to = target.as_str(), ?warp, "changing system");
            self.host.request_scene_switch(SceneKind::for_system(&target));
            self.events.emit(SystemEvent::SystemChanged { from, to: target });
            self.events.deliver();
        }
        outcome
    }

    /// Move to the effective default system as computed right now.
    ///
    /// A reset starts a fresh loop: no loop time is carried. When the
    /// override is in use the player warps in aboard the ship, since the
    /// override system may not support a regular spawn.
    pub fn reset_to_default(&mut self) -> RequestOutcome {
        let target = self.registry.effective_default().to_string();
        let warp = if self.registry.override_active() {
            WarpSource::Ship
        } else {
            WarpSource::None
        };
        self.request_change_with(&target, warp, None)
    }

    /// Reset to the default system unless the current one respawns in place.
    ///
    /// Returns `None` when no reset was requested.
    pub fn on_player_death(&mut self) -> Option<RequestOutcome> {
        let phase = self.machine.phase();
        if !phase.is_active() {
            debug!(?phase, "death outside an active system; ignoring");
            return None;
        }
        let respawns_here = self
            .registry
            .system(self.machine.current())
            .is_some_and(|s| s.config.respawns_here());
        if respawns_here {
            debug!(system = self.machine.current(), "respawning in place");
            return None;
        }
        Some(self.reset_to_default())
    }

    // -----------------------------------------------------------------------
    // Host callbacks
    // -----------------------------------------------------------------------

    /// The host finished loading `scene`.
    pub fn on_scene_loaded(&mut self, scene: SceneKind) {
        self.scene = Some(scene);
        if !scene.is_simulation() {
            let default = self.registry.effective_default().to_string();
            debug!(?scene, "non-simulation scene loaded; going idle");
            self.machine.enter_idle(&default);
            return;
        }

        let prepared = self.machine.scene_loaded();
        let requested = prepared.system;
        let mut system = requested.clone();
        if scene == SceneKind::EyeOfTheUniverse && system != EYE_SYSTEM {
            self.machine.redirect_current(EYE_SYSTEM);
            system = EYE_SYSTEM.to_string();
        }
        if !self.registry.contains_system(&system) {
            let fallback = self.registry.effective_default().to_string();
            error!(
                system = system.as_str(),
                fallback = fallback.as_str(),
                "system does not exist; loading default instead"
            );
            self.machine.redirect_current(&fallback);
            system = fallback;
        }

        if system != requested {
            self.events.emit(SystemEvent::SystemChanged {
                from: requested,
                to: system.clone(),
            });
        }

        if let Some(seconds) = prepared.carried_elapsed {
            if self.time_loop_enabled(&system) || system == PRIMARY_SYSTEM {
                debug!(seconds, "restoring loop time");
                self.host.restore_loop_seconds(seconds);
            }
        }

        self.build_system(&system, prepared.arrived_by);
        self.machine.construction_complete(self.max_ready_frames);
        info!(system = system.as_str(), "system loaded");
        self.events.emit(SystemEvent::SystemLoaded { system });
        self.events.deliver();
    }

    /// Open every body's cache and hand each body to the builder in
    /// registration order. A body that fails is logged and skipped.
    fn build_system(&mut self, system: &str, arrived_by: WarpSource) {
        let ids: Vec<BodyId> = self.registry.body_ids_of(system).to_vec();
        for &id in &ids {
            if let Some(body) = self.registry.body_mut(id) {
                if let Err(e) = body.load_cache() {
                    warn!(body = body.name(), error = %e, "body cache failed to load");
                }
            }
        }

        let Some(config) = self.registry.system(system).map(|s| s.config.clone()) else {
            return;
        };
        let ctx = SystemContext {
            system,
            config: &config,
            arrived_by,
            is_primary: system == PRIMARY_SYSTEM,
        };

        for id in ids {
            let result = match self.registry.body(id) {
                Some(body) => {
                    debug!(body = body.name(), "building body");
                    self.host.build_body(body, &ctx)
                }
                None => continue,
            };
            self.attach_built_body(system, id, result);
        }
        self.host.apply_builtin_fixups(&ctx);
    }

    /// Attach a build result to its body and report it.
    fn attach_built_body(&mut self, system: &str, id: BodyId, result: Result<RuntimeHandle, BuildError>) {
        let Some(body) = self.registry.body_mut(id) else {
            return;
        };
        let name = body.name().to_string();
        match result {
            Ok(handle) => {
                body.runtime = Some(handle);
                self.events.emit(SystemEvent::BodyLoaded {
                    system: system.to_string(),
                    body: name,
                });
            }
            Err(e) => {
                error!(system, body = name.as_str(), error = %e, "failed to build body");
                self.diagnostics.record(FailedConfig {
                    file: if body.relative_path.is_empty() {
                        name.clone()
                    } else {
                        body.relative_path.clone()
                    },
                    package: body.package.as_deref().map(|p| p.unique_name.clone()),
                    kind: FailureKind::Build,
                    detail: e.to_string(),
                });
                self.events.emit(SystemEvent::BodyFailed {
                    system: system.to_string(),
                    body: name,
                    reason: e.to_string(),
                });
            }
        }
    }

    /// The host unloaded the active scene. Releases every body of the
    /// current system.
    pub fn on_scene_unloaded(&mut self) {
        let system = self.machine.current().to_string();
        let write_back = self.settings.write_body_caches;
        let ids: Vec<BodyId> = self.registry.body_ids_of(&system).to_vec();
        for id in ids {
            let Some(body) = self.registry.body_mut(id) else {
                continue;
            };
            body.runtime = None;
            if let Err(e) = body.unload_cache(write_back) {
                warn!(body = body.name(), error = %e, "failed to write body cache");
            }
        }
        self.machine.scene_unloaded();
        self.scene = None;
        debug!(system = system.as_str(), "system unloaded");
    }

    /// Per-frame update. Polls the readiness gate while waiting for it.
    pub fn advance(&mut self) -> Phase {
        if self.machine.phase() == Phase::ActiveNotReady {
            let first_poll = self.machine.gate().is_first_poll();
            let predicate = self.host.avatar_ready() || (first_poll && self.host.bypass_wait());
            if let Some(forced) = self.machine.tick(predicate) {
                if forced {
                    warn!(
                        system = self.machine.current(),
                        frames = self.max_ready_frames,
                        "player not ready in time; forcing ready"
                    );
                }
                self.emit_ready();
            }
        }
        self.machine.phase()
    }

    /// Mark the system ready without waiting for the gate. A second signal
    /// for the same activation is ignored.
    pub fn signal_ready(&mut self) -> bool {
        let accepted = self.machine.signal_ready();
        if accepted {
            self.emit_ready();
        }
        accepted
    }

    fn emit_ready(&mut self) {
        let system = self.machine.current().to_string();
        info!(system = system.as_str(), "system ready");
        self.events.emit(SystemEvent::SystemReady { system });
        self.events.deliver();
    }

    /// Clear and re-seed the registry. Only allowed while idle, when no
    /// body is built and no cache is open.
    pub fn reset_registry(&mut self) -> bool {
        let phase = self.machine.phase();
        if phase != Phase::Idle {
            warn!(?phase, "registry reset refused while a system is loaded");
            return false;
        }
        self.registry.reset();
        self.diagnostics.clear();
        let default = self.registry.effective_default().to_string();
        self.machine.redirect_current(&default);
        true
    }

    fn time_loop_enabled(&self, system: &str) -> bool {
        self.registry
            .system(system)
            .is_some_and(|s| s.config.time_loop_enabled())
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn effective_default(&self) -> &str {
        self.registry.effective_default()
    }

    pub fn is_ready(&self) -> bool {
        self.machine.is_ready()
    }

    pub fn current_system_id(&self) -> &str {
        self.machine.current()
    }

    pub fn previous_system_id(&self) -> Option<&str> {
        self.machine.previous()
    }

    pub fn phase(&self) -> Phase {
        self.machine.phase()
    }

    pub fn machine(&self) -> &TransitionMachine {
        &self.machine
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The scene the host last finished loading, if it is still loaded.
    pub fn loaded_scene(&self) -> Option<SceneKind> {
        self.scene
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;
    use crate::test_utils::RecordingHost;
    use horizons_core::config::StarSystemConfig;
    use horizons_core::test_utils::{body, spawn_body};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn registry_with(systems: &[(&str, StarSystemConfig)], bodies: &[(&str, &str)]) -> Registry {
        let mut registry = Registry::new();
        for (id, config) in systems {
            registry
                .register_system(id, config.clone(), &format!("systems/{id}.json"), None)
                .unwrap();
        }
        for (name, system) in bodies {
            registry
                .register_body(body(name, system), &format!("planets/{name}.json"), None)
                .unwrap();
        }
        registry
    }

    fn enter(manager: &mut StarSystemManager<RecordingHost>, system: &str) {
        manager.request_system_change(system, WarpSource::None);
        manager.on_scene_unloaded();
        let scene = SceneKind::for_system(system);
        manager.on_scene_loaded(scene);
        manager.host_mut().avatar_ready = true;
        manager.advance();
        manager.host_mut().avatar_ready = false;
    }

    #[test]
    fn starts_idle_on_default() {
        let manager = StarSystemManager::new(Registry::new(), RecordingHost::new());
        assert_eq!(manager.phase(), Phase::Idle);
        assert_eq!(manager.current_system_id(), PRIMARY_SYSTEM);
        assert!(!manager.is_ready());
    }

    #[test]
    fn scene_switch_requested_for_target() {
        let registry = registry_with(&[("Alpha", StarSystemConfig::default())], &[]);
        let mut manager = StarSystemManager::new(registry, RecordingHost::new());
        manager.request_system_change(EYE_SYSTEM, WarpSource::Vessel);
        assert_eq!(manager.host().last_scene_request(), Some(SceneKind::EyeOfTheUniverse));
    }

    #[test]
    fn bodies_build_in_registration_order() {
        let registry = registry_with(&[], &[("b", "Alpha"), ("a", "Alpha"), ("x", "Other")]);
        let mut manager = StarSystemManager::new(registry, RecordingHost::new());
        enter(&mut manager, "Alpha");

        assert_eq!(manager.host().built_in("Alpha"), vec!["b", "a"]);
        assert_eq!(manager.host().fixups, vec!["Alpha"]);
        let ids = manager.registry().body_ids_of("Alpha").to_vec();
        assert!(ids.iter().all(|&id| manager.registry().body(id).unwrap().runtime.is_some()));
    }

    #[test]
    fn failed_body_does_not_block_readiness() {
        let registry = registry_with(&[], &[("good", "Alpha"), ("bad", "Alpha"), ("fine", "Alpha")]);
        let mut host = RecordingHost::new();
        host.fail_body("bad");
        let mut manager = StarSystemManager::new(registry, host);
        enter(&mut manager, "Alpha");

        assert!(manager.is_ready());
        assert_eq!(manager.host().built_in("Alpha"), vec!["good", "fine"]);
        assert_eq!(manager.diagnostics().failed_file_names(), vec!["planets/bad.json"]);
        assert!(manager.events().history().any(|e| matches!(
            e,
            SystemEvent::BodyFailed { body, .. } if body == "bad"
        )));
    }

    #[test]
    fn unknown_target_falls_back_to_default() {
        let mut manager = StarSystemManager::new(Registry::new(), RecordingHost::new());
        manager.request_system_change("Nowhere", WarpSource::None);
        assert_eq!(manager.machine().pending_target(), Some(PRIMARY_SYSTEM));
        assert_eq!(
            manager.events().history().last(),
            Some(&SystemEvent::SystemChanged {
                from: PRIMARY_SYSTEM.into(),
                to: PRIMARY_SYSTEM.into(),
            })
        );

        manager.on_scene_loaded(SceneKind::SolarSystem);
        assert_eq!(manager.current_system_id(), PRIMARY_SYSTEM);
        assert_eq!(manager.phase(), Phase::ActiveNotReady);
    }

    #[test]
    fn eye_scene_forces_eye_system() {
        let mut manager = StarSystemManager::new(Registry::new(), RecordingHost::new());
        manager.request_system_change(PRIMARY_SYSTEM, WarpSource::None);
        manager.on_scene_loaded(SceneKind::EyeOfTheUniverse);
        assert_eq!(manager.current_system_id(), EYE_SYSTEM);

        // Listeners learn where the player actually ended up.
        let changes: Vec<_> = manager
            .events()
            .history()
            .filter(|e| e.kind() == EventKind::SystemChanged)
            .cloned()
            .collect();
        assert_eq!(
            changes.last(),
            Some(&SystemEvent::SystemChanged {
                from: PRIMARY_SYSTEM.into(),
                to: EYE_SYSTEM.into(),
            })
        );
    }

    #[test]
    fn handles_attached_to_the_bodies_that_built() {
        let registry = registry_with(&[], &[("a", "Alpha"), ("b", "Alpha"), ("c", "Alpha")]);
        let mut host = RecordingHost::new();
        host.fail_body("b");
        let mut manager = StarSystemManager::new(registry, host);
        enter(&mut manager, "Alpha");

        let handles: Vec<_> = manager
            .registry()
            .body_ids_of("Alpha")
            .iter()
            .map(|&id| manager.registry().body(id).unwrap().runtime)
            .collect();
        assert_eq!(
            handles,
            vec![Some(RuntimeHandle(1)), None, Some(RuntimeHandle(2))]
        );
        assert_eq!(manager.host().fixups, vec!["Alpha"]);
    }

    #[test]
    fn title_toggle_reloads_title_scene() {
        let mut manager = StarSystemManager::new(Registry::new(), RecordingHost::new());
        manager.on_scene_loaded(SceneKind::Title);
        manager.configure(Settings {
            custom_title_screen: true,
            ..Default::default()
        });
        // First configuration happens at startup and never reloads.
        assert!(manager.host().scene_requests.is_empty());

        manager.configure(Settings::default());
        assert_eq!(manager.host().last_scene_request(), Some(SceneKind::Title));
        assert_eq!(manager.loaded_scene(), Some(SceneKind::Title));
    }

    #[test]
    fn title_toggle_ignored_in_game() {
        let mut manager = StarSystemManager::new(Registry::new(), RecordingHost::new());
        manager.configure(Settings::default());
        enter(&mut manager, PRIMARY_SYSTEM);
        let requests = manager.host().scene_requests.len();

        manager.configure(Settings {
            custom_title_screen: true,
            ..Default::default()
        });
        assert_eq!(manager.host().scene_requests.len(), requests);
    }

    #[test]
    fn title_scene_goes_idle_on_default() {
        let registry = registry_with(
            &[(
                "Alpha",
                StarSystemConfig {
                    start_here: Some(true),
                    ..Default::default()
                },
            )],
            &[],
        );
        let mut manager = StarSystemManager::new(registry, RecordingHost::new());
        enter(&mut manager, EYE_SYSTEM);
        manager.on_scene_unloaded();
        manager.on_scene_loaded(SceneKind::Title);
        assert_eq!(manager.phase(), Phase::Idle);
        assert_eq!(manager.current_system_id(), "Alpha");
    }

    #[test]
    fn loop_time_carried_into_time_loop_system() {
        let registry = registry_with(&[("Alpha", StarSystemConfig::default())], &[]);
        let mut manager = StarSystemManager::new(registry, RecordingHost::new());
        enter(&mut manager, "Alpha");

        manager.host_mut().loop_seconds = 120.0;
        enter(&mut manager, PRIMARY_SYSTEM);
        assert_eq!(manager.host().restored_seconds, vec![120.0]);
        assert_eq!(manager.previous_system_id(), Some("Alpha"));
    }

    #[test]
    fn loop_time_not_restored_without_time_loop() {
        let no_loop = StarSystemConfig {
            enable_time_loop: Some(false),
            ..Default::default()
        };
        let registry = registry_with(&[("Alpha", StarSystemConfig::default()), ("Still", no_loop)], &[]);
        let mut manager = StarSystemManager::new(registry, RecordingHost::new());
        enter(&mut manager, "Alpha");

        manager.host_mut().loop_seconds = 30.0;
        enter(&mut manager, "Still");
        assert!(manager.host().restored_seconds.is_empty());

        // Nothing is carried out of a system without a time loop.
        manager.host_mut().loop_seconds = 30.0;
        enter(&mut manager, PRIMARY_SYSTEM);
        assert!(manager.host().restored_seconds.is_empty());
    }

    #[test]
    fn death_respects_respawn_here() {
        let respawn = StarSystemConfig {
            respawn_here: Some(true),
            ..Default::default()
        };
        let registry = registry_with(&[("Home", respawn), ("Away", StarSystemConfig::default())], &[]);
        let mut manager = StarSystemManager::new(registry, RecordingHost::new());

        enter(&mut manager, "Home");
        assert_eq!(manager.on_player_death(), None);

        enter(&mut manager, "Away");
        assert_eq!(manager.on_player_death(), Some(RequestOutcome::Accepted));
        assert_eq!(manager.machine().pending_target(), Some(PRIMARY_SYSTEM));

        // In flight: a second death is ignored.
        assert_eq!(manager.on_player_death(), None);
    }

    #[test]
    fn override_reset_warps_in_by_ship() {
        let registry = registry_with(&[("Alpha", StarSystemConfig::default())], &[]);
        let mut manager = StarSystemManager::new(registry, RecordingHost::new());
        manager.configure(Settings {
            default_system_override: Some("Alpha".into()),
            ..Default::default()
        });
        assert_eq!(manager.current_system_id(), "Alpha");

        enter(&mut manager, PRIMARY_SYSTEM);
        manager.reset_to_default();
        manager.on_scene_unloaded();
        manager.on_scene_loaded(SceneKind::SolarSystem);
        assert_eq!(manager.current_system_id(), "Alpha");
        assert_eq!(manager.machine().arrived_by(), WarpSource::Ship);
    }

    #[test]
    fn configure_while_active_waits_for_reset() {
        let registry = registry_with(&[("Alpha", StarSystemConfig::default())], &[]);
        let mut manager = StarSystemManager::new(registry, RecordingHost::new());
        enter(&mut manager, PRIMARY_SYSTEM);
        manager.configure(Settings {
            default_system_override: Some("Alpha".into()),
            ..Default::default()
        });
        assert_eq!(manager.current_system_id(), PRIMARY_SYSTEM);
        assert_eq!(manager.effective_default(), "Alpha");
    }

    #[test]
    fn bypass_only_on_first_poll() {
        let mut manager = StarSystemManager::new(Registry::new(), RecordingHost::new());
        manager.host_mut().bypass = true;
        manager.request_system_change(PRIMARY_SYSTEM, WarpSource::None);
        manager.on_scene_loaded(SceneKind::SolarSystem);
        assert_eq!(manager.advance(), Phase::ActiveReady);
    }

    #[test]
    fn events_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut manager = StarSystemManager::new(
            registry_with(&[], &[("rock", "Alpha")]),
            RecordingHost::new(),
        );
        for kind in [EventKind::SystemChanged, EventKind::SystemLoaded, EventKind::SystemReady] {
            let sink = seen.clone();
            manager
                .events_mut()
                .on(kind, Box::new(move |e| sink.borrow_mut().push(e.kind())));
        }
        enter(&mut manager, "Alpha");
        assert_eq!(
            *seen.borrow(),
            vec![EventKind::SystemChanged, EventKind::SystemLoaded, EventKind::SystemReady]
        );
    }

    #[test]
    fn unload_clears_runtime_handles() {
        let registry = registry_with(&[], &[("rock", "Alpha")]);
        let mut manager = StarSystemManager::new(registry, RecordingHost::new());
        enter(&mut manager, "Alpha");
        manager.on_scene_unloaded();

        let id = manager.registry().body_ids_of("Alpha")[0];
        assert!(manager.registry().body(id).unwrap().runtime.is_none());
        assert!(!manager.is_ready());
        assert_eq!(manager.phase(), Phase::Transitioning);
        assert_eq!(manager.loaded_scene(), None);
    }

    #[test]
    fn registry_reset_only_while_idle() {
        let registry = registry_with(&[], &[("rock", "Alpha")]);
        let mut manager = StarSystemManager::new(registry, RecordingHost::new());
        manager.request_system_change("Alpha", WarpSource::None);
        assert!(!manager.reset_registry());

        manager.on_scene_loaded(SceneKind::SolarSystem);
        assert_eq!(manager.phase(), Phase::ActiveNotReady);
        assert!(!manager.reset_registry());
        assert!(manager.registry().contains_system("Alpha"));

        manager.on_scene_unloaded();
        manager.on_scene_loaded(SceneKind::Title);
        assert!(manager.reset_registry());
        assert!(!manager.registry().contains_system("Alpha"));
        assert_eq!(manager.current_system_id(), PRIMARY_SYSTEM);
    }

    #[test]
    fn spawn_body_is_tracked() {
        let mut registry = Registry::new();
        let spawn = registry
            .register_body(spawn_body("home", "Alpha"), "planets/home.json", None)
            .unwrap();
        let manager = StarSystemManager::new(registry, RecordingHost::new());
        assert_eq!(manager.registry().system("Alpha").unwrap().spawn, Some(spawn));
    }
}
