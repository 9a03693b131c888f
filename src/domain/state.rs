//! Shared session state snapshot

use crate::domain::capture::{CapabilitySet, CaptureKind};
use crate::domain::time_limit::TimeLimit;

/// Process-wide view of the active session.
/// At most one session is active at any time; every observer sees the
/// same snapshot after any single mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    pub is_active: bool,
    pub active_kind: Option<CaptureKind>,
    pub capabilities: CapabilitySet,
    pub time_limit: TimeLimit,
    pub is_persistent: bool,
}

impl SessionState {
    /// The idle state: nothing recording, no capabilities held
    pub fn idle() -> Self {
        Self {
            is_active: false,
            active_kind: None,
            capabilities: CapabilitySet::none(),
            time_limit: TimeLimit::default_limit(),
            is_persistent: false,
        }
    }

    /// Apply a partial update, field by field
    pub fn apply(&mut self, patch: &StatePatch) {
        if let Some(active) = patch.is_active {
            self.is_active = active;
        }
        if let Some(kind) = patch.active_kind {
            self.active_kind = kind;
        }
        if let Some(caps) = patch.capabilities {
            self.capabilities = caps;
        }
        if let Some(limit) = patch.time_limit {
            self.time_limit = limit;
        }
        if let Some(persistent) = patch.is_persistent {
            self.is_persistent = persistent;
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::idle()
    }
}

/// Partial state update merged into the current snapshot.
/// `active_kind` uses a nested Option so a patch can explicitly clear it.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatePatch {
    pub is_active: Option<bool>,
    pub active_kind: Option<Option<CaptureKind>>,
    pub capabilities: Option<CapabilitySet>,
    pub time_limit: Option<TimeLimit>,
    pub is_persistent: Option<bool>,
}

impl StatePatch {
    /// Patch that marks a session active for the given request
    pub fn activate(kind: CaptureKind, time_limit: TimeLimit) -> Self {
        Self {
            is_active: Some(true),
            active_kind: Some(Some(kind)),
            capabilities: Some(kind.capabilities()),
            time_limit: Some(time_limit),
            is_persistent: Some(true),
        }
    }

    /// Patch that resets everything back to idle
    pub fn deactivate() -> Self {
        Self {
            is_active: Some(false),
            active_kind: Some(None),
            capabilities: Some(CapabilitySet::none()),
            time_limit: None,
            is_persistent: Some(false),
        }
    }
}
