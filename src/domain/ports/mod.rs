//! Port trait definitions (Hexagonal Architecture)
//!
//! Adapters (simulator, scripted double, WebDriver) implement these traits;
//! services depend only on them.

pub mod environment;

pub use environment::{ActionPort, ArcadeEnvironment, ControlPort, ObservationPort};
