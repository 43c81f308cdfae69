//! Body-level configuration.

use serde::{Deserialize, Serialize};

use super::common::{Color, Vec3};
use crate::id::PRIMARY_SYSTEM;

/// One celestial body and the props placed on or around it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetConfig {
    /// Short display name. Not unique: several bodies may share it.
    pub name: String,

    /// The system this body belongs to. Defaults to the primary system.
    pub star_system: String,

    /// Present when this body hosts the system's spawn point.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spawn: Option<SpawnModule>,

    /// Remove an existing body of the same name instead of creating one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destroy: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub orbit: Option<OrbitModule>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub props: Option<PropModule>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub volumes: Option<VolumesModule>,
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            star_system: PRIMARY_SYSTEM.to_string(),
            spawn: None,
            destroy: None,
            orbit: None,
            props: None,
            volumes: None,
        }
    }
}

impl PlanetConfig {
    pub fn new(name: impl Into<String>, star_system: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            star_system: star_system.into(),
            ..Default::default()
        }
    }

    pub fn is_spawn_point(&self) -> bool {
        self.spawn.is_some()
    }

    pub fn destroys(&self) -> bool {
        self.destroy.unwrap_or(false)
    }
}

/// Where the player and ship appear when the system loads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnModule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_spawn_point: Option<Vec3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_spawn_rotation: Option<Vec3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ship_spawn_point: Option<Vec3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_with_suit: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitModule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semi_major_axis: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_static: Option<bool>,
}

/// Props placed on the body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropModule {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<DetailInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dialogue: Vec<DialogueInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tornados: Vec<TornadoInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub geysers: Vec<GeyserInfo>,

    /// Deprecated: use `volumes.reveal_volumes`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reveal: Option<Vec<RevealVolumeInfo>>,

    /// Deprecated: use `volumes.audio_volumes`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_volumes: Option<Vec<AudioVolumeInfo>>,
}

/// A copied or asset-bundle prop at a fixed position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailInfo {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_bundle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Vec3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,
    /// Stay loaded while the player is outside the body's sector.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub keep_loaded: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogueInfo {
    pub xml_file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_trigger: Option<RemoteTriggerInfo>,

    /// Deprecated: use `remote_trigger.position`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_trigger_position: Option<Vec3>,
    /// Deprecated: use `remote_trigger.radius`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_trigger_radius: Option<f32>,
    /// Deprecated: use `remote_trigger.prereq_condition`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_trigger_prereq_condition: Option<String>,
}

/// Starts a dialogue from a distance when the player walks into it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteTriggerInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prereq_condition: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TornadoType {
    Upwards,
    Downwards,
    Hurricane,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TornadoInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tint: Option<Color>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TornadoType>,

    /// Deprecated: use `type`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downwards: Option<bool>,
}

impl TornadoInfo {
    pub fn effective_kind(&self) -> TornadoType {
        self.kind.unwrap_or(TornadoType::Upwards)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeyserInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset_from_surface: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_duration: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f32>,
}

/// Trigger volumes placed on the body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumesModule {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reveal_volumes: Vec<RevealVolumeInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub audio_volumes: Vec<AudioVolumeInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub destruction_volumes: Vec<DestructionVolumeInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealVolumeInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reveals: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioVolumeInfo {
    pub audio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathType {
    #[default]
    Default,
    Impact,
    Asphyxiation,
    Energy,
    Supernova,
    Crushed,
    Lava,
    BlackHole,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DestructionVolumeInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f32>,
    pub death_type: DeathType,
}
