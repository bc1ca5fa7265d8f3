//! Observation snapshots and directional moves.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Immutable snapshot of the externally visible environment state.
///
/// A fresh value is produced on every poll. When the rendering surface cannot
/// be located the snapshot is degraded (`render_surface_valid == false`)
/// rather than an error; the caller decides what that means.
///
/// `readings_valid` is cleared whenever the score or state indicators could
/// not actually be read and hold neutral placeholders instead. Such a
/// snapshot says nothing about the game and must not be compared against
/// real readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Observation {
    pub score: u64,
    pub high_score: u64,
    pub running: bool,
    pub paused: bool,
    pub render_surface_valid: bool,
    /// Goal-incompatible end state (collision, game over)
    pub terminated: bool,
    pub readings_valid: bool,
}

impl Observation {
    /// The degraded snapshot used when nothing could be read.
    pub const fn unavailable() -> Self {
        Self {
            score: 0,
            high_score: 0,
            running: false,
            paused: false,
            render_surface_valid: false,
            terminated: false,
            readings_valid: false,
        }
    }

    /// Whether the environment has stopped accepting moves productively.
    pub const fn is_stopped(&self) -> bool {
        !self.running || self.terminated
    }
}

/// One of the four logical headings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// The 180° reversal of this heading.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Grid delta as `(dx, dy)` with y growing downwards.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key-symbol family used to express a direction.
///
/// Both families map many-to-one onto [`Direction`]; the controller is
/// indifferent to which one reaches the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFamily {
    #[default]
    Arrow,
    Letter,
}

impl InputFamily {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Arrow => Self::Letter,
            Self::Letter => Self::Arrow,
        }
    }
}

/// A single discrete turn: a heading plus the key family that carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub direction: Direction,
    pub family: InputFamily,
}

impl Move {
    pub const fn arrow(direction: Direction) -> Self {
        Self {
            direction,
            family: InputFamily::Arrow,
        }
    }

    pub const fn letter(direction: Direction) -> Self {
        Self {
            direction,
            family: InputFamily::Letter,
        }
    }

    /// Human-readable key name, e.g. `ArrowUp` or `KeyW`.
    pub const fn key_name(&self) -> &'static str {
        match (self.family, self.direction) {
            (InputFamily::Arrow, Direction::Up) => "ArrowUp",
            (InputFamily::Arrow, Direction::Down) => "ArrowDown",
            (InputFamily::Arrow, Direction::Left) => "ArrowLeft",
            (InputFamily::Arrow, Direction::Right) => "ArrowRight",
            (InputFamily::Letter, Direction::Up) => "KeyW",
            (InputFamily::Letter, Direction::Down) => "KeyS",
            (InputFamily::Letter, Direction::Left) => "KeyA",
            (InputFamily::Letter, Direction::Right) => "KeyD",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key_name())
    }
}
