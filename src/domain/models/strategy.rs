//! Search strategies: named, replayable move patterns.
//!
//! A strategy is a fixed spatial-coverage heuristic expressed as a finite
//! sequence of moves. Patterns are computed once and replayed cyclically by
//! attempt index, so the Nth move of a strategy is the same no matter when
//! the controller rotates into it.
//!
//! The set of strategies is closed ([`StrategyKind`]); the catalog orders and
//! selects among them but never adds new kinds at runtime.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::observation::{Direction, InputFamily, Move};
use crate::domain::errors::{DomainError, DomainResult};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Run length of the standard blocks used by spiral, grid and random-biased.
pub const BLOCK_LEN: usize = 5;

/// Run length of the aggressive strategy's blocks.
pub const AGGRESSIVE_BLOCK_LEN: usize = 6;

/// Number of steps in the exhaustive pattern.
pub const EXHAUSTIVE_LEN: usize = 100;

/// A pattern must exercise at least this many distinct directions.
pub const MIN_DIRECTIONS_COVERED: usize = 3;

// ---------------------------------------------------------------------------
// StrategyKind
// ---------------------------------------------------------------------------

/// The closed set of search heuristics, in increasing aggressiveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Same-direction blocks cycling Right, Down, Left, Up.
    Spiral,
    /// Zigzag sweep biased toward row coverage.
    Grid,
    /// Right/Down-heavy drift with a late Left/Up correction.
    RandomBiased,
    /// Longer uniform runs for faster quadrant traversal.
    Aggressive,
    /// Maximally diverse last resort: turns every step, alternating key families.
    Exhaustive,
}

impl StrategyKind {
    pub const ALL: [Self; 5] = [
        Self::Spiral,
        Self::Grid,
        Self::RandomBiased,
        Self::Aggressive,
        Self::Exhaustive,
    ];

    /// Stable identifier used in logs, config and results.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Spiral => "spiral",
            Self::Grid => "grid",
            Self::RandomBiased => "random-biased",
            Self::Aggressive => "aggressive",
            Self::Exhaustive => "exhaustive",
        }
    }

    /// Build the reference pattern for this kind.
    pub fn pattern(self) -> Vec<Move> {
        use Direction::{Down, Left, Right, Up};

        match self {
            Self::Spiral => blocks(&[Right, Down, Left, Up], BLOCK_LEN),
            Self::Grid => blocks(&[Right, Down, Left, Down, Right, Up, Left, Up], BLOCK_LEN),
            Self::RandomBiased => {
                blocks(&[Right, Down, Right, Down, Right, Down, Left, Up], BLOCK_LEN)
            }
            Self::Aggressive => blocks(&[Right, Down, Left, Up], AGGRESSIVE_BLOCK_LEN),
            Self::Exhaustive => exhaustive_pattern(),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s.trim().to_lowercase())
            .ok_or_else(|| DomainError::InvalidStrategy {
                name: s.to_string(),
                reason: "unknown strategy kind".to_string(),
            })
    }
}

/// Expand each heading into a run of `len` arrow-key moves.
fn blocks(headings: &[Direction], len: usize) -> Vec<Move> {
    headings
        .iter()
        .flat_map(|&direction| std::iter::repeat(Move::arrow(direction)).take(len))
        .collect()
}

/// Groups of four perpendicular turns, alternating rotation sense per group
/// and key family per step. No step is a 180° reversal of the previous one.
fn exhaustive_pattern() -> Vec<Move> {
    // Clockwise order; indices two apart are opposites.
    const WHEEL: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];

    let mut pattern = Vec::with_capacity(EXHAUSTIVE_LEN);
    let mut family = InputFamily::Arrow;
    let mut start = 0usize;

    for group in 0..EXHAUSTIVE_LEN / WHEEL.len() {
        let step = if group % 2 == 0 { 1 } else { WHEEL.len() - 1 };
        let mut index = start;
        for _ in 0..WHEEL.len() {
            pattern.push(Move {
                direction: WHEEL[index],
                family,
            });
            family = family.toggled();
            index = (index + step) % WHEEL.len();
        }
        let last = (index + WHEEL.len() - step) % WHEEL.len();
        start = (last + 1) % WHEEL.len();
    }

    pattern
}

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

/// A named, validated move pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Strategy {
    kind: StrategyKind,
    pattern: Vec<Move>,
}

impl Strategy {
    /// Build a strategy from an explicit pattern, validating it.
    pub fn new(kind: StrategyKind, pattern: Vec<Move>) -> DomainResult<Self> {
        validate_pattern(kind.name(), &pattern)?;
        Ok(Self { kind, pattern })
    }

    /// Build the reference strategy for `kind`.
    pub fn reference(kind: StrategyKind) -> DomainResult<Self> {
        Self::new(kind, kind.pattern())
    }

    pub const fn kind(&self) -> StrategyKind {
        self.kind
    }

    pub const fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn pattern(&self) -> &[Move] {
        &self.pattern
    }

    pub fn len(&self) -> usize {
        self.pattern.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }

    /// The move replayed at `attempt`: `pattern[attempt mod len]`.
    pub fn next_move(&self, attempt: u32) -> Move {
        self.pattern[attempt as usize % self.pattern.len()]
    }

    /// Distinct headings this pattern exercises.
    pub fn directions_covered(&self) -> BTreeSet<Direction> {
        self.pattern.iter().map(|m| m.direction).collect()
    }
}

/// Reject empty patterns and patterns that cannot recover from a silently
/// ignored move (fewer than three distinct directions).
pub fn validate_pattern(name: &str, pattern: &[Move]) -> DomainResult<()> {
    if pattern.is_empty() {
        return Err(DomainError::InvalidStrategy {
            name: name.to_string(),
            reason: "pattern is empty".to_string(),
        });
    }

    let covered: BTreeSet<Direction> = pattern.iter().map(|m| m.direction).collect();
    if covered.len() < MIN_DIRECTIONS_COVERED {
        return Err(DomainError::InvalidStrategy {
            name: name.to_string(),
            reason: format!(
                "pattern covers {} direction(s), at least {} required",
                covered.len(),
                MIN_DIRECTIONS_COVERED
            ),
        });
    }

    Ok(())
}
