//! Common test utilities for integration tests
//!
//! Shared fixtures for driving the controller, lifecycle manager and
//! scenario runner quickly: zero settle time and millisecond polling.

use std::time::Duration;

use forage::domain::models::{LifecycleConfig, SearchParameters, SimulatorConfig};

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
/// Call this at the beginning of tests that need logging.
#[allow(dead_code)]
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Default search parameters with no settle delay.
#[allow(dead_code)]
pub fn fast_params(budget: u32) -> SearchParameters {
    SearchParameters {
        budget,
        settle: Duration::ZERO,
        observe_timeout: Duration::from_millis(500),
        ..Default::default()
    }
}

/// Lifecycle waits that poll every millisecond and give up quickly.
#[allow(dead_code)]
pub fn fast_lifecycle() -> LifecycleConfig {
    LifecycleConfig {
        poll_interval_ms: 1,
        wait_timeout_ms: 250,
    }
}

/// A small deterministic simulator.
#[allow(dead_code)]
pub fn small_grid(seed: u64) -> SimulatorConfig {
    SimulatorConfig {
        width: 10,
        height: 10,
        seed,
        ..Default::default()
    }
}
