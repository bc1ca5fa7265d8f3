//! Forage - blind goal search against opaque arcade environments
//!
//! Forage drives a game it cannot see inside: it replays fixed directional
//! move patterns, rotating between them on a fixed cadence, and stops as
//! soon as the observed score rises or the attempt budget runs out. A
//! lifecycle manager and a scenario runner sit on top for end-to-end checks.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, errors and the environment ports
//! - **Service Layer** (`services`): strategy catalog, search controller,
//!   session lifecycle and scenario runner
//! - **Adapters** (`adapters`): simulator, WebDriver, pacing and test doubles
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```no_run
//! use forage::adapters::GridArcade;
//! use forage::domain::models::{Config, SearchParameters};
//! use forage::services::{SearchController, SessionLifecycle, StrategyCatalog};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let config = Config::default();
//! let mut game = GridArcade::new(&config.simulator)?;
//! SessionLifecycle::new(&mut game, &config.lifecycle).start().await?;
//!
//! let mut controller = SearchController::new(
//!     &mut game,
//!     StrategyCatalog::reference()?,
//!     SearchParameters::default(),
//! )?;
//! let result = controller.seek().await?;
//! println!("{} after {} attempts", result.outcome, result.attempts);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    Config, Direction, InputFamily, Move, Observation, SearchOutcome, SearchParameters,
    SearchResult, SessionState, Strategy, StrategyKind,
};
pub use domain::ports::{ActionPort, ArcadeEnvironment, ControlPort, ObservationPort};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{ScenarioRunner, SearchController, SessionLifecycle, StrategyCatalog};
