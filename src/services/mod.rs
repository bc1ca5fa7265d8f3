//! Application services: strategy rotation, goal search, session lifecycle
//! and the scenario suite built on top of them.

pub mod scenario_runner;
pub mod search_controller;
pub mod session_lifecycle;
pub mod strategy_catalog;

pub use scenario_runner::{Scenario, ScenarioReport, ScenarioRunner, SuiteReport};
pub use search_controller::{observe_within, SearchController};
pub use session_lifecycle::SessionLifecycle;
pub use strategy_catalog::StrategyCatalog;
