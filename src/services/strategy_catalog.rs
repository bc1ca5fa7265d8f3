//! Strategy catalog: the movement patterns a search rotates through.
//!
//! The active strategy for an attempt is `floor(attempt / period) mod len`,
//! and each pattern replays cyclically from the attempt index.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Move, Strategy, StrategyKind};

/// Ordered, validated list of strategies the controller rotates through.
///
/// Built once and immutable afterwards. Every pattern is validated at
/// construction so a malformed strategy fails here and never mid-search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyCatalog {
    strategies: Vec<Strategy>,
}

impl StrategyCatalog {
    /// Build a catalog from already-constructed strategies.
    pub fn new(strategies: Vec<Strategy>) -> DomainResult<Self> {
        if strategies.is_empty() {
            return Err(DomainError::EmptyCatalog);
        }
        Ok(Self { strategies })
    }

    /// The five reference strategies in increasing aggressiveness.
    pub fn reference() -> DomainResult<Self> {
        Self::from_kinds(&StrategyKind::ALL)
    }

    /// Build a catalog of reference patterns in the given rotation order.
    pub fn from_kinds(kinds: &[StrategyKind]) -> DomainResult<Self> {
        let strategies = kinds
            .iter()
            .map(|&kind| Strategy::reference(kind))
            .collect::<DomainResult<Vec<_>>>()?;
        Self::new(strategies)
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Strategy> {
        self.strategies.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Strategy> {
        self.strategies.iter()
    }

    /// Index of the active strategy at `attempt` under round-robin rotation:
    /// `floor(attempt / rotation_period) mod len`.
    pub fn strategy_index_at(&self, attempt: u32, rotation_period: u32) -> usize {
        let period = rotation_period.max(1);
        (attempt / period) as usize % self.strategies.len()
    }

    /// The move a given strategy replays at `attempt`.
    pub fn next_move(&self, strategy_index: usize, attempt: u32) -> Move {
        self.strategies[strategy_index % self.strategies.len()].next_move(attempt)
    }
}
