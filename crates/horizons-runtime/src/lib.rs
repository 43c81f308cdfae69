//! Horizons Runtime -- sequences star system transitions.
//!
//! The [`StarSystemManager`] owns a populated [`horizons_core::Registry`]
//! and drives a single in-flight transition at a time:
//!
//! 1. A change request is accepted and the host is asked to switch scenes.
//! 2. When the scene has loaded, each body of the new system is handed to
//!    the host's [`BodyBuilder`] in registration order. A body that fails to
//!    build is logged and skipped.
//! 3. The [`ReadinessGate`](gate::ReadinessGate) is polled once per frame
//!    via [`StarSystemManager::advance`] until the player is ready, or
//!    forced open after [`MAX_READY_FRAMES`](gate::MAX_READY_FRAMES).
//!
//! Lifecycle notifications are published on an [`EventBus`](event::EventBus)
//! after each step completes.

pub mod error;
pub mod event;
pub mod gate;
pub mod host;
pub mod manager;
pub mod transition;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::BuildError;
pub use event::{EventBus, EventKind, SystemEvent};
pub use host::{BodyBuilder, Host, ReadinessCheck, SceneHost, SceneKind, SystemContext};
pub use manager::StarSystemManager;
pub use transition::{Phase, RequestOutcome, WarpSource};
