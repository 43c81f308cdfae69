//! Headless runner: loads every package under a mods directory and drives a
//! few system transitions without an engine.
//!
//! Run with: `cargo run -p horizons-runtime --example headless_runner -- <mods-dir> [system]`
//!
//! Settings are read from `settings.{json,ron,toml}` in the mods directory.
//! Log output honors `RUST_LOG`; otherwise the level comes from the
//! `verbose_logs` and `debug` settings.

use std::path::PathBuf;

use tracing::info;
use tracing_subscriber::EnvFilter;

use horizons_core::{BodyRecord, Registry, RuntimeHandle};
use horizons_data::{ContentLoader, discover_packages, load_settings};
use horizons_runtime::{
    BodyBuilder, BuildError, ReadinessCheck, SceneHost, SceneKind, StarSystemManager,
    SystemContext, WarpSource,
};

/// Pretends to build bodies and becomes ready a few frames after each load.
#[derive(Debug, Default)]
struct HeadlessHost {
    frames_until_ready: u32,
    next_handle: u64,
    loop_seconds: f32,
    scene: Option<SceneKind>,
}

impl BodyBuilder for HeadlessHost {
    fn build_body(
        &mut self,
        body: &BodyRecord,
        ctx: &SystemContext<'_>,
    ) -> Result<RuntimeHandle, BuildError> {
        println!("  [{}] {} ({})", ctx.system, body.name(), body.relative_path);
        self.next_handle += 1;
        self.frames_until_ready = 3;
        Ok(RuntimeHandle(self.next_handle))
    }
}

impl ReadinessCheck for HeadlessHost {
    fn avatar_ready(&self) -> bool {
        self.frames_until_ready == 0
    }
}

impl SceneHost for HeadlessHost {
    fn request_scene_switch(&mut self, scene: SceneKind) {
        self.scene = Some(scene);
    }

    fn loop_seconds_elapsed(&self) -> f32 {
        self.loop_seconds
    }

    fn restore_loop_seconds(&mut self, seconds: f32) {
        self.loop_seconds = seconds;
    }
}

/// Unload, load and poll until ready. Returns the frames it took.
fn run_transition(manager: &mut StarSystemManager<HeadlessHost>) -> u32 {
    let Some(scene) = manager.host_mut().scene.take() else {
        return 0;
    };
    manager.on_scene_unloaded();
    manager.on_scene_loaded(scene);

    let mut frames = 0;
    while !manager.is_ready() {
        frames += 1;
        let host = manager.host_mut();
        host.frames_until_ready = host.frames_until_ready.saturating_sub(1);
        host.loop_seconds += 1.0 / 60.0;
        manager.advance();
    }
    frames
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let mods_dir = PathBuf::from(args.next().unwrap_or_else(|| "mods".to_string()));
    let visit = args.next();

    let settings = load_settings(&mods_dir)?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level().as_str()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // --- Load content ---

    let packages = discover_packages(&mods_dir)?;
    let mut registry = Registry::new();
    let mut loader = ContentLoader::new();
    let reports = loader.load_all(&mut registry, &packages);

    println!("=== Packages ===");
    for report in &reports {
        println!(
            "{}: {} systems, {} bodies, {} failures",
            report.package,
            report.systems_loaded,
            report.bodies_loaded,
            report.failures.len()
        );
    }
    for failed in loader.diagnostics().failed_file_names() {
        println!("  failed: {failed}");
    }

    // --- Drive transitions ---

    let mut manager = StarSystemManager::new(registry, HeadlessHost::default());
    manager.configure(settings);
    info!(default = manager.effective_default(), "starting");

    println!("\n=== Entering {} ===", manager.effective_default());
    manager.reset_to_default();
    let frames = run_transition(&mut manager);
    println!("ready after {frames} frames");

    if let Some(target) = visit {
        println!("\n=== Warping to {target} ===");
        manager.request_system_change(&target, WarpSource::Ship);
        let frames = run_transition(&mut manager);
        println!(
            "now in {} (from {:?}), ready after {frames} frames",
            manager.current_system_id(),
            manager.previous_system_id()
        );
    }

    println!("\n=== Systems ===");
    for id in manager.registry().system_ids() {
        println!("{id}: {:?}", manager.registry().body_names_of(id));
    }
    Ok(())
}
