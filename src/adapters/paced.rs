//! Rate-limited observation wrapper.
//!
//! The controller and lifecycle waits may poll as fast as they like; this
//! wrapper holds observations to the external system's own update cadence.
//! Moves and controls pass straight through.

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{LifecycleControl, Move, Observation};
use crate::domain::ports::{ActionPort, ControlPort, ObservationPort};

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Environment wrapper that paces [`ObservationPort::observe`].
pub struct PacedEnvironment<E> {
    inner: E,
    limiter: DirectLimiter,
}

impl<E> PacedEnvironment<E> {
    pub fn new(inner: E, max_observations_per_second: u32) -> DomainResult<Self> {
        let rate = NonZeroU32::new(max_observations_per_second).ok_or_else(|| {
            DomainError::InvalidParameters(
                "max_observations_per_second must be at least 1".to_string(),
            )
        })?;
        Ok(Self {
            inner,
            limiter: RateLimiter::direct(Quota::per_second(rate).allow_burst(NonZeroU32::MIN)),
        })
    }

    pub const fn inner(&self) -> &E {
        &self.inner
    }

    pub fn into_inner(self) -> E {
        self.inner
    }
}

#[async_trait]
impl<E: ObservationPort> ObservationPort for PacedEnvironment<E> {
    async fn observe(&self) -> Observation {
        self.limiter.until_ready().await;
        self.inner.observe().await
    }
}

#[async_trait]
impl<E: ActionPort> ActionPort for PacedEnvironment<E> {
    async fn dispatch(&mut self, mv: Move) -> DomainResult<()> {
        self.inner.dispatch(mv).await
    }
}

#[async_trait]
impl<E: ControlPort> ControlPort for PacedEnvironment<E> {
    async fn press(&mut self, control: LifecycleControl) -> DomainResult<()> {
        self.inner.press(control).await
    }
}
