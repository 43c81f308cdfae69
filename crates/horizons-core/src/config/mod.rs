//! Serde configuration schema for systems and bodies.
//!
//! Every overridable field is an `Option` so that "present in the file" and
//! "left at its default" can be told apart by the merge engine. Effective
//! values are read through accessor methods that apply the defaults.

pub mod body;
pub mod common;
pub mod system;

pub use body::{
    AudioVolumeInfo, DeathType, DestructionVolumeInfo, DetailInfo, DialogueInfo, GeyserInfo,
    OrbitModule, PlanetConfig, PropModule, RemoteTriggerInfo, RevealVolumeInfo, SpawnModule,
    TornadoInfo, TornadoType, VolumesModule,
};
pub use common::{Color, Vec3};
pub use system::{CuriosityInfo, NomaiCoordinates, SkyboxModule, StarSystemConfig, VesselModule};
