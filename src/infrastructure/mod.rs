//! Infrastructure layer
//!
//! Configuration loading and logging setup. Environment adapters live in
//! [`crate::adapters`].

pub mod config;
pub mod logging;
