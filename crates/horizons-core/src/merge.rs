//! Field-level overlay of one configuration onto another.
//!
//! Merging is shallow: every top-level field that is present on the incoming
//! side replaces the canonical value, nested modules and lists included.
//! Absent fields leave the canonical value untouched. The result depends on
//! merge order; the last contributor wins per overlapping field.

use crate::config::StarSystemConfig;

/// Overlay `incoming` onto `self`.
pub trait Merge {
    fn merge(&mut self, incoming: Self);
}

/// Replace `slot` with `incoming` when the latter is present.
pub fn overlay<T>(slot: &mut Option<T>, incoming: Option<T>) {
    if incoming.is_some() {
        *slot = incoming;
    }
}

impl Merge for StarSystemConfig {
    fn merge(&mut self, incoming: Self) {
        // Destructure so a new field cannot be forgotten here.
        let StarSystemConfig {
            start_here,
            respawn_here,
            enable_time_loop,
            destroy_stock_planets,
            travel_audio,
            skybox,
            vessel,
            fact_required_for_warp,
            can_enter_via_warp_drive,
            map_restricted,
            curiosities,
            coords,
            travel_audio_clip,
            travel_audio_file_path,
        } = incoming;

        overlay(&mut self.start_here, start_here);
        overlay(&mut self.respawn_here, respawn_here);
        overlay(&mut self.enable_time_loop, enable_time_loop);
        overlay(&mut self.destroy_stock_planets, destroy_stock_planets);
        overlay(&mut self.travel_audio, travel_audio);
        overlay(&mut self.skybox, skybox);
        overlay(&mut self.vessel, vessel);
        overlay(&mut self.fact_required_for_warp, fact_required_for_warp);
        overlay(&mut self.can_enter_via_warp_drive, can_enter_via_warp_drive);
        overlay(&mut self.map_restricted, map_restricted);
        overlay(&mut self.curiosities, curiosities);
        overlay(&mut self.coords, coords);
        overlay(&mut self.travel_audio_clip, travel_audio_clip);
        overlay(&mut self.travel_audio_file_path, travel_audio_file_path);
    }
}
