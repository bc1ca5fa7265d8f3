/// Domain models for the observed game session lifecycle.
///
/// The external system owns the state machine; forage only derives the
/// current state from an [`Observation`] and issues lifecycle controls.
use serde::{Deserialize, Serialize};
use std::fmt;

use super::observation::Observation;

/// Session lifecycle status as seen from outside
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// Not started, or reset
    Idle,
    /// Accepting moves
    Running,
    /// Temporarily paused
    Paused,
    /// Goal-incompatible end state (collision)
    Terminated,
}

impl SessionState {
    /// Derive the state from a snapshot. Termination wins over every flag.
    pub const fn from_observation(obs: &Observation) -> Self {
        if obs.terminated {
            Self::Terminated
        } else if obs.running && obs.paused {
            Self::Paused
        } else if obs.running {
            Self::Running
        } else {
            Self::Idle
        }
    }

    /// Whether the search controller may be invoked in this state.
    pub const fn accepts_search(self) -> bool {
        matches!(self, Self::Running)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Terminated => "terminated",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-directional controls on the external input surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleControl {
    Start,
    /// Pause when running, resume when paused
    PauseToggle,
    Reset,
    /// Fresh run after a goal-incompatible end
    Restart,
}

impl LifecycleControl {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::PauseToggle => "pause_toggle",
            Self::Reset => "reset",
            Self::Restart => "restart",
        }
    }
}

impl fmt::Display for LifecycleControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
