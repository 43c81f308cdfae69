//! Bounded readiness gate.
//!
//! After a system is constructed, the gate is polled once per frame with the
//! current value of the readiness predicate. It opens as soon as the
//! predicate holds, or unconditionally on the last allowed frame.

/// Frames to wait for the readiness predicate before forcing the gate open.
pub const MAX_READY_FRAMES: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStatus {
    /// Not armed.
    Closed,
    /// Armed and still waiting.
    Waiting { frames_polled: u32 },
    /// Open. `forced` is set when the frame bound ran out.
    Open { forced: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadinessGate {
    status: GateStatus,
    max_frames: u32,
}

impl Default for ReadinessGate {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadinessGate {
    pub fn new() -> Self {
        Self {
            status: GateStatus::Closed,
            max_frames: MAX_READY_FRAMES,
        }
    }

    /// Start waiting, opening after at most `max_frames` polls.
    pub fn arm(&mut self, max_frames: u32) {
        self.max_frames = max_frames.max(1);
        self.status = GateStatus::Waiting { frames_polled: 0 };
    }

    /// Poll once with the predicate's value for this frame.
    pub fn poll(&mut self, predicate: bool) -> GateStatus {
        if let GateStatus::Waiting { frames_polled } = self.status {
            let frames_polled = frames_polled + 1;
            self.status = if predicate {
                GateStatus::Open { forced: false }
            } else if frames_polled >= self.max_frames {
                GateStatus::Open { forced: true }
            } else {
                GateStatus::Waiting { frames_polled }
            };
        }
        self.status
    }

    /// Whether the next poll is the first one since arming.
    pub fn is_first_poll(&self) -> bool {
        self.status == GateStatus::Waiting { frames_polled: 0 }
    }

    pub fn close(&mut self) {
        self.status = GateStatus::Closed;
    }

    pub fn status(&self) -> GateStatus {
        self.status
    }

    pub fn is_open(&self) -> bool {
        matches!(self.status, GateStatus::Open { .. })
    }
}
