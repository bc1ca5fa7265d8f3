//! Environment ports - the narrow surface through which forage touches the game.
//!
//! The three traits model a single exclusively-owned external resource. They
//! are split by concern so adapters and wrappers can be reasoned about
//! separately, and recombined by [`ArcadeEnvironment`].

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::errors::DomainResult;
use crate::domain::models::{LifecycleControl, Move, Observation};

/// Pull-based read of the externally visible state.
#[async_trait]
pub trait ObservationPort: Send + Sync {
    /// Take a fresh snapshot.
    ///
    /// Must not have side effects. When the surface cannot be located the
    /// implementation returns a degraded snapshot instead of failing.
    async fn observe(&self) -> Observation;
}

/// Discrete directional input.
#[async_trait]
pub trait ActionPort: Send + Sync {
    /// Dispatch exactly one logical input event for `mv`.
    ///
    /// Repeated identical calls are separate turns and must not be coalesced.
    async fn dispatch(&mut self, mv: Move) -> DomainResult<()>;

    /// Dispatch `mv`, then suspend for `settle` so the next observation
    /// reflects its effect.
    async fn act(&mut self, mv: Move, settle: Duration) -> DomainResult<()> {
        self.dispatch(mv).await?;
        if !settle.is_zero() {
            tokio::time::sleep(settle).await;
        }
        Ok(())
    }
}

/// Lifecycle controls (start, pause toggle, reset, restart).
#[async_trait]
pub trait ControlPort: Send + Sync {
    /// Trigger a lifecycle control. Returns once the input is delivered, not
    /// once the environment has reacted.
    async fn press(&mut self, control: LifecycleControl) -> DomainResult<()>;
}

/// Everything the controller, lifecycle manager and scenario runner need.
pub trait ArcadeEnvironment: ObservationPort + ActionPort + ControlPort {}

impl<T: ObservationPort + ActionPort + ControlPort> ArcadeEnvironment for T {}
