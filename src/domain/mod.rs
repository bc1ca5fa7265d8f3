//! Domain layer for forage
//!
//! Observation and move models, the strategy catalog data, and the port
//! traits that environment adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
