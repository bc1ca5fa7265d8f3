//! Domain models

pub mod config;
pub mod observation;
pub mod search;
pub mod session;
pub mod strategy;

pub use config::*;
pub use observation::{Direction, InputFamily, Move, Observation};
pub use search::{SearchOutcome, SearchParameters, SearchResult, SearchSession};
pub use session::{LifecycleControl, SessionState};
pub use strategy::{Strategy, StrategyKind};
