//! A scriptable host for tests. Compiled for tests and under the
//! `test-utils` feature.

use std::collections::HashSet;

use horizons_core::{BodyRecord, RuntimeHandle};

use crate::error::BuildError;
use crate::host::{BodyBuilder, ReadinessCheck, SceneHost, SceneKind, SystemContext};

/// Records every call and answers from public fields.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub avatar_ready: bool,
    pub bypass: bool,
    pub loop_seconds: f32,
    /// Bodies whose build fails.
    pub failing_bodies: HashSet<String>,

    pub scene_requests: Vec<SceneKind>,
    /// `(system, body)` in build order.
    pub built: Vec<(String, String)>,
    pub fixups: Vec<String>,
    pub restored_seconds: Vec<f32>,
    next_handle: u64,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_body(&mut self, name: &str) {
        self.failing_bodies.insert(name.to_string());
    }

    /// Names of the bodies built for `system`, in order.
    pub fn built_in(&self, system: &str) -> Vec<&str> {
        self.built
            .iter()
            .filter(|(s, _)| s == system)
            .map(|(_, b)| b.as_str())
            .collect()
    }

    pub fn last_scene_request(&self) -> Option<SceneKind> {
        self.scene_requests.last().copied()
    }
}

impl BodyBuilder for RecordingHost {
    fn build_body(
        &mut self,
        body: &BodyRecord,
        ctx: &SystemContext<'_>,
    ) -> Result<RuntimeHandle, BuildError> {
        if self.failing_bodies.contains(body.name()) {
            return Err(BuildError::Failed {
                detail: format!("{} is scripted to fail", body.name()),
            });
        }
        self.built.push((ctx.system.to_string(), body.name().to_string()));
        self.next_handle += 1;
        Ok(RuntimeHandle(self.next_handle))
    }

    fn apply_builtin_fixups(&mut self, ctx: &SystemContext<'_>) {
        self.fixups.push(ctx.system.to_string());
    }
}

impl ReadinessCheck for RecordingHost {
    fn avatar_ready(&self) -> bool {
        self.avatar_ready
    }

    fn bypass_wait(&self) -> bool {
        self.bypass
    }
}

impl SceneHost for RecordingHost {
    fn request_scene_switch(&mut self, scene: SceneKind) {
        self.scene_requests.push(scene);
    }

    fn loop_seconds_elapsed(&self) -> f32 {
        self.loop_seconds
    }

    fn restore_loop_seconds(&mut self, seconds: f32) {
        self.restored_seconds.push(seconds);
        self.loop_seconds = seconds;
    }
}
