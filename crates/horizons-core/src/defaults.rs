//! Selection of the system the process starts in.

use tracing::{debug, warn};

use crate::id::PRIMARY_SYSTEM;

/// Tracks the declared default system and the user override.
///
/// Precedence, highest first:
/// 1. the override, when it names a known system;
/// 2. the first non-primary system that declared itself the start system;
/// 3. the primary system.
///
/// Once a non-primary system holds the declared default, re-declaring the
/// primary has no effect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultSystemResolver {
    declared: Option<String>,
    override_id: Option<String>,
}

impl DefaultSystemResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `id` declared itself as the start system.
    ///
    /// Returns `true` if the declared default changed.
    pub fn claim(&mut self, id: &str) -> bool {
        if id == PRIMARY_SYSTEM {
            debug!(system = id, "primary system claims default; keeping current default");
            return false;
        }
        match &self.declared {
            None => {
                debug!(system = id, "default system declared");
                self.declared = Some(id.to_string());
                true
            }
            Some(existing) if existing == id => false,
            Some(existing) => {
                warn!(
                    system = id,
                    current = existing.as_str(),
                    "another system already claimed default; ignoring"
                );
                false
            }
        }
    }

    /// Set or clear the user override. An empty id clears it.
    ///
    /// Returns `true` if the override changed.
    pub fn set_override(&mut self, id: Option<String>) -> bool {
        let id = id.filter(|s| !s.trim().is_empty());
        if self.override_id == id {
            return false;
        }
        self.override_id = id;
        true
    }

    pub fn override_id(&self) -> Option<&str> {
        self.override_id.as_deref()
    }

    /// The declared default, ignoring the override.
    pub fn declared(&self) -> &str {
        self.declared.as_deref().unwrap_or(PRIMARY_SYSTEM)
    }

    /// Whether the override names a system for which `is_known` holds.
    pub fn override_active(&self, is_known: impl Fn(&str) -> bool) -> bool {
        self.override_id.as_deref().is_some_and(is_known)
    }

    /// The effective default system. An override naming an unknown system is
    /// ignored.
    pub fn effective(&self, is_known: impl Fn(&str) -> bool) -> &str {
        match self.override_id.as_deref() {
            Some(id) if is_known(id) => id,
            _ => self.declared(),
        }
    }

    /// Forget the declared default. The override survives.
    pub fn reset_declared(&mut self) {
        self.declared = None;
    }
}
