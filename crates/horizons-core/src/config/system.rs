//! System-level configuration.

use serde::{Deserialize, Serialize};

use super::common::{Color, Vec3};

/// Configuration shared by every body in one star system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarSystemConfig {
    /// Declares this system as the one the process starts in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_here: Option<bool>,

    /// Dying in this system respawns the player here instead of resetting
    /// to the default system.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub respawn_here: Option<bool>,

    /// Whether the time loop runs in this system. Defaults to true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_time_loop: Option<bool>,

    /// Remove the stock bodies when this system loads. Defaults to true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destroy_stock_planets: Option<bool>,

    /// Audio played while travelling to this system.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_audio: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub skybox: Option<SkyboxModule>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vessel: Option<VesselModule>,

    /// Fact the player must know before the warp drive can reach this system.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fact_required_for_warp: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_enter_via_warp_drive: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_restricted: Option<bool>,

    /// Ship-log curiosities. Replaced wholesale on merge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curiosities: Option<Vec<CuriosityInfo>>,

    /// Deprecated: use `vessel.coords`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coords: Option<NomaiCoordinates>,

    /// Deprecated: use `travel_audio`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_audio_clip: Option<String>,

    /// Deprecated: use `travel_audio`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_audio_file_path: Option<String>,
}

impl StarSystemConfig {
    pub fn starts_here(&self) -> bool {
        self.start_here.unwrap_or(false)
    }

    pub fn respawns_here(&self) -> bool {
        self.respawn_here.unwrap_or(false)
    }

    pub fn time_loop_enabled(&self) -> bool {
        self.enable_time_loop.unwrap_or(true)
    }

    pub fn destroys_stock_planets(&self) -> bool {
        self.destroy_stock_planets.unwrap_or(true)
    }

    /// True once a contributor has set the fields that identify who "owns"
    /// the system's presentation (travel audio or skybox).
    pub fn has_identity(&self) -> bool {
        self.travel_audio.as_deref().is_some_and(|s| !s.is_empty()) || self.skybox.is_some()
    }

    /// The coordinates used to reach this system with the vessel, if any.
    pub fn vessel_coords(&self) -> Option<&NomaiCoordinates> {
        self.vessel.as_ref().and_then(|v| v.coords.as_ref())
    }
}

/// Replacement skybox for the system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyboxModule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_bundle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destroy_star_field: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Vec3>,
}

/// How the vessel reaches this system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VesselModule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coords: Option<NomaiCoordinates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warp_exit_position: Option<Vec3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spawn_on_vessel: Option<bool>,
}

/// Three axes of coordinate digits, each in `0..=5`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NomaiCoordinates {
    #[serde(default)]
    pub x: Vec<i32>,
    #[serde(default)]
    pub y: Vec<i32>,
    #[serde(default)]
    pub z: Vec<i32>,
}

impl NomaiCoordinates {
    pub fn new(x: &[i32], y: &[i32], z: &[i32]) -> Self {
        Self {
            x: x.to_vec(),
            y: y.to_vec(),
            z: z.to_vec(),
        }
    }
}

/// A ship-log curiosity shown in the rumour map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CuriosityInfo {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_color: Option<Color>,
}
