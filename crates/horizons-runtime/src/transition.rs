//! The transition state machine.
//!
//! ```text
//!            request                 scene loaded             gate open
//!   Idle ───────────▶ Preparing ───────────────▶ ActiveNotReady ─────────▶ ActiveReady
//!                        ▲   (bodies built)                                   │
//!                        │ scene loaded                               request │
//!                        └──────────────────── Transitioning ◀────────────────┘
//! ```
//!
//! Only one transition is in flight at a time. A change request received
//! while `Preparing` or `Transitioning` is dropped; the caller must re-issue
//! it once the machine is active again. The machine holds no registry or
//! host references: the manager feeds it events and reads its state.

use tracing::{debug, warn};

use crate::gate::{GateStatus, ReadinessGate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Menu or credits; no system is running.
    Idle,
    /// A system scene is loading or its bodies are being built.
    Preparing,
    /// Built, waiting for the readiness gate.
    ActiveNotReady,
    /// Fully ready.
    ActiveReady,
    /// Leaving the current system; the next scene has been requested.
    Transitioning,
}

impl Phase {
    pub fn is_active(self) -> bool {
        matches!(self, Phase::ActiveNotReady | Phase::ActiveReady)
    }

    /// Whether a transition is in flight.
    pub fn is_in_flight(self) -> bool {
        matches!(self, Phase::Preparing | Phase::Transitioning)
    }
}

/// How the player arrives in the next system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WarpSource {
    /// Regular spawn.
    #[default]
    None,
    /// Warped in aboard the ship.
    Ship,
    /// Warped in through the vessel.
    Vessel,
}

/// Result of a change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Accepted,
    /// The request matches the transition already in flight.
    AlreadyPending,
    /// Another transition is in flight; the request was dropped.
    Dropped,
}

impl RequestOutcome {
    pub fn is_accepted(self) -> bool {
        self == RequestOutcome::Accepted
    }
}

#[derive(Debug, Clone, PartialEq)]
struct PendingChange {
    target: String,
    warp: WarpSource,
}

/// Per-transition values handed to the manager when a scene finishes loading.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSystem {
    pub system: String,
    pub previous: Option<String>,
    /// Elapsed loop time to restore, consumed by this transition.
    pub carried_elapsed: Option<f32>,
    pub arrived_by: WarpSource,
}

#[derive(Debug, Clone)]
pub struct TransitionMachine {
    phase: Phase,
    current: String,
    previous: Option<String>,
    pending: Option<PendingChange>,
    arrived_by: WarpSource,
    carried_elapsed: Option<f32>,
    gate: ReadinessGate,
    /// Bumped every time a system starts preparing.
    activation: u64,
    ready: bool,
}

impl TransitionMachine {
    /// An idle machine whose current system is `initial`.
    pub fn new(initial: &str) -> Self {
        Self {
            phase: Phase::Idle,
            current: initial.to_string(),
            previous: None,
            pending: None,
            arrived_by: WarpSource::None,
            carried_elapsed: None,
            gate: ReadinessGate::new(),
            activation: 0,
            ready: false,
        }
    }

    // -----------------------------------------------------------------------
    // Inputs
    // -----------------------------------------------------------------------

    /// Ask to move to `target`.
    ///
    /// `carry` is the elapsed loop time to restore on arrival, if any.
    pub fn request_change(&mut self, target: &str, warp: WarpSource, carry: Option<f32>) -> RequestOutcome {
        match self.phase {
            Phase::Preparing | Phase::Transitioning => {
                let same = self
                    .pending
                    .as_ref()
                    .is_some_and(|p| p.target == target && p.warp == warp);
                if same {
                    debug!(to = target, "change already pending");
                    RequestOutcome::AlreadyPending
                } else {
                    warn!(
                        to = target,
                        phase = ?self.phase,
                        "transition in flight; dropping change request"
                    );
                    RequestOutcome::Dropped
                }
            }
            Phase::Idle | Phase::ActiveNotReady | Phase::ActiveReady => {
                debug!(from = self.current.as_str(), to = target, ?warp, "change accepted");
                self.pending = Some(PendingChange {
                    target: target.to_string(),
                    warp,
                });
                self.carried_elapsed = carry.filter(|s| *s > 0.0);
                self.phase = if self.phase == Phase::Idle {
                    Phase::Preparing
                } else {
                    Phase::Transitioning
                };
                self.gate.close();
                self.ready = false;
                RequestOutcome::Accepted
            }
        }
    }

    /// The host finished loading a simulation scene.
    ///
    /// Consumes the pending change, if any: the current system becomes the
    /// previous one, and the carried time and warp source are handed out
    /// exactly once. Without a pending change (a reload in place) the
    /// current system is prepared again.
    pub fn scene_loaded(&mut self) -> PreparedSystem {
        if let Some(pending) = self.pending.take() {
            let previous = std::mem::replace(&mut self.current, pending.target);
            self.previous = Some(previous);
            self.arrived_by = pending.warp;
        } else {
            self.arrived_by = WarpSource::None;
        }
        let carried_elapsed = self.carried_elapsed.take();

        self.phase = Phase::Preparing;
        self.activation += 1;
        self.ready = false;
        self.gate.close();

        PreparedSystem {
            system: self.current.clone(),
            previous: self.previous.clone(),
            carried_elapsed,
            arrived_by: self.arrived_by,
        }
    }

    /// Replace the current system without a transition, e.g. when the
    /// requested one turns out not to exist.
    pub fn redirect_current(&mut self, system: &str) {
        if self.current != system {
            debug!(from = self.current.as_str(), to = system, "redirecting current system");
            self.current = system.to_string();
        }
    }

    /// Every body has been built. Arms the readiness gate.
    pub fn construction_complete(&mut self, max_ready_frames: u32) {
        if self.phase != Phase::Preparing {
            warn!(phase = ?self.phase, "construction completed outside of preparation");
            return;
        }
        self.phase = Phase::ActiveNotReady;
        self.gate.arm(max_ready_frames);
    }

    /// Poll the readiness gate for one frame.
    ///
    /// Returns `Some(forced)` on the frame the machine becomes ready.
    pub fn tick(&mut self, predicate: bool) -> Option<bool> {
        if self.phase != Phase::ActiveNotReady {
            return None;
        }
        match self.gate.poll(predicate) {
            GateStatus::Open { forced } => self.signal_ready().then_some(forced),
            GateStatus::Waiting { .. } | GateStatus::Closed => None,
        }
    }

    /// Mark the current activation ready. A second signal for the same
    /// activation is ignored.
    pub fn signal_ready(&mut self) -> bool {
        if self.ready {
            warn!(
                system = self.current.as_str(),
                activation = self.activation,
                "ready signalled twice; ignoring"
            );
            return false;
        }
        if self.phase != Phase::ActiveNotReady {
            warn!(phase = ?self.phase, "ready signalled before construction finished; ignoring");
            return false;
        }
        self.ready = true;
        self.phase = Phase::ActiveReady;
        true
    }

    /// The active scene was unloaded. The gate closes, and a live system
    /// moves to `Transitioning` until the next scene load: change requests
    /// made in between are dropped.
    pub fn scene_unloaded(&mut self) {
        if self.phase.is_active() {
            debug!(system = self.current.as_str(), "scene unloaded under a live system");
            self.phase = Phase::Transitioning;
        }
        self.gate.close();
        self.ready = false;
    }

    /// Return to the menu. Drops any pending change and carried time.
    pub fn enter_idle(&mut self, current: &str) {
        self.phase = Phase::Idle;
        self.pending = None;
        self.carried_elapsed = None;
        self.arrived_by = WarpSource::None;
        self.gate.close();
        self.ready = false;
        self.current = current.to_string();
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn previous(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    /// Target of the transition in flight.
    pub fn pending_target(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.target.as_str())
    }

    pub fn carried_elapsed(&self) -> Option<f32> {
        self.carried_elapsed
    }

    pub fn arrived_by(&self) -> WarpSource {
        self.arrived_by
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn activation(&self) -> u64 {
        self.activation
    }

    pub fn gate(&self) -> &ReadinessGate {
        &self.gate
    }
}
