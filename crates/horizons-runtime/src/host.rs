//! Traits the host environment implements.
//!
//! The manager never touches the engine directly. It asks the host to build
//! bodies, to report whether the player is ready, and to switch scenes.

use horizons_core::config::StarSystemConfig;
use horizons_core::{BodyRecord, EYE_SYSTEM, RuntimeHandle};

use crate::error::BuildError;
use crate::transition::WarpSource;

/// The top-level scenes the host can load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKind {
    Title,
    SolarSystem,
    EyeOfTheUniverse,
    Credits,
    PostCredits,
}

impl SceneKind {
    /// The scene that hosts `system`. Only the eye system has its own scene.
    pub fn for_system(system: &str) -> Self {
        if system == EYE_SYSTEM {
            SceneKind::EyeOfTheUniverse
        } else {
            SceneKind::SolarSystem
        }
    }

    /// Whether a star system runs in this scene.
    pub fn is_simulation(self) -> bool {
        matches!(self, SceneKind::SolarSystem | SceneKind::EyeOfTheUniverse)
    }
}

/// What a builder knows about the system being constructed.
#[derive(Debug, Clone, Copy)]
pub struct SystemContext<'a> {
    pub system: &'a str,
    pub config: &'a StarSystemConfig,
    /// How the player arrived.
    pub arrived_by: WarpSource,
    pub is_primary: bool,
}

/// Turns body records into runtime objects.
pub trait BodyBuilder {
    fn build_body(
        &mut self,
        body: &BodyRecord,
        ctx: &SystemContext<'_>,
    ) -> Result<RuntimeHandle, BuildError>;

    /// Adjust built-in, non-data-driven content after every body is built.
    fn apply_builtin_fixups(&mut self, _ctx: &SystemContext<'_>) {}
}

/// Answers whether the player can be handed control.
pub trait ReadinessCheck {
    /// The avatar is initialized and placed at its spawn point.
    fn avatar_ready(&self) -> bool;

    /// The player is past the point where waiting matters. Only consulted on
    /// the first poll of an activation.
    fn bypass_wait(&self) -> bool {
        false
    }
}

/// Scene control and the time-loop clock.
pub trait SceneHost {
    fn request_scene_switch(&mut self, scene: SceneKind);

    /// Seconds elapsed in the current time loop.
    fn loop_seconds_elapsed(&self) -> f32;

    fn restore_loop_seconds(&mut self, seconds: f32);
}

/// Everything the manager needs from the host.
pub trait Host: BodyBuilder + ReadinessCheck + SceneHost {}

impl<T: BodyBuilder + ReadinessCheck + SceneHost> Host for T {}
