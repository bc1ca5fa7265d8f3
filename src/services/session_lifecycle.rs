//! Session lifecycle: start, pause, resume, reset and restart.
//!
//! Each operation presses one control and then polls until the observed
//! state satisfies the operation's predicate, or the wait times out.
//! Unreadable polls never satisfy a predicate.

use std::time::Duration;
use tracing::{debug, instrument};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{LifecycleConfig, LifecycleControl, Observation, SessionState};
use crate::domain::ports::{ControlPort, ObservationPort};
use crate::services::search_controller::observe_within;

/// Lifecycle manager over one exclusively borrowed environment.
pub struct SessionLifecycle<'a, E: ?Sized> {
    env: &'a mut E,
    poll_interval: Duration,
    wait_timeout: Duration,
    observe_timeout: Duration,
}

impl<'a, E> SessionLifecycle<'a, E>
where
    E: ObservationPort + ControlPort + ?Sized,
{
    pub fn new(env: &'a mut E, config: &LifecycleConfig) -> Self {
        Self {
            env,
            poll_interval: config.poll_interval(),
            wait_timeout: config.wait_timeout(),
            observe_timeout: config.wait_timeout(),
        }
    }

    /// Bound each individual poll more tightly than the overall wait.
    pub const fn with_observe_timeout(mut self, limit: Duration) -> Self {
        self.observe_timeout = limit;
        self
    }

    pub async fn observe(&self) -> Observation {
        observe_within(&*self.env, self.observe_timeout).await
    }

    /// Current externally observed state.
    pub async fn state(&self) -> SessionState {
        SessionState::from_observation(&self.observe().await)
    }

    /// Start a run and wait until it is running.
    pub async fn start(&mut self) -> DomainResult<Observation> {
        self.transition("start", LifecycleControl::Start, |obs| obs.running)
            .await
    }

    /// Pause a running session and wait for the pause indicator.
    pub async fn pause(&mut self) -> DomainResult<Observation> {
        self.transition("pause", LifecycleControl::PauseToggle, |obs| obs.paused)
            .await
    }

    /// Resume a paused session and wait for the pause indicator to clear.
    pub async fn resume(&mut self) -> DomainResult<Observation> {
        self.transition("resume", LifecycleControl::PauseToggle, |obs| !obs.paused)
            .await
    }

    /// Reset from any state and wait for an idle, zero-score session.
    pub async fn reset(&mut self) -> DomainResult<Observation> {
        self.transition("reset", LifecycleControl::Reset, |obs| {
            !obs.running && obs.score == 0
        })
        .await
    }

    /// Start a fresh run after a goal-incompatible end.
    pub async fn restart(&mut self) -> DomainResult<Observation> {
        self.transition("restart", LifecycleControl::Restart, |obs| {
            obs.running && !obs.terminated
        })
        .await
    }

    /// Bring the session to a state the search accepts, from a readable
    /// snapshot. Presses nothing if it is already running.
    pub async fn ensure_running(&mut self) -> DomainResult<Observation> {
        let obs = self.wait_until("ensure_running", |_| true).await?;
        let state = SessionState::from_observation(&obs);
        if state.accepts_search() {
            return Ok(obs);
        }
        debug!(%state, "bringing session to running");
        match state {
            SessionState::Paused => self.resume().await,
            SessionState::Terminated => self.restart().await,
            SessionState::Idle | SessionState::Running => self.start().await,
        }
    }

    #[instrument(skip(self, predicate))]
    async fn transition(
        &mut self,
        operation: &str,
        control: LifecycleControl,
        predicate: fn(&Observation) -> bool,
    ) -> DomainResult<Observation> {
        self.env.press(control).await?;
        let obs = self.wait_until(operation, predicate).await?;
        debug!(state = %SessionState::from_observation(&obs), "lifecycle settled");
        Ok(obs)
    }

    /// Poll until a readable observation satisfies `predicate`, bounded by
    /// the wait timeout.
    pub async fn wait_until(
        &self,
        operation: &str,
        predicate: fn(&Observation) -> bool,
    ) -> DomainResult<Observation> {
        let polling = async {
            loop {
                let obs = self.observe().await;
                if !obs.readings_valid {
                    debug!(operation, "skipping unreadable observation");
                } else if predicate(&obs) {
                    return obs;
                }
                tokio::time::sleep(self.poll_interval).await;
            }
        };

        tokio::time::timeout(self.wait_timeout, polling)
            .await
            .map_err(|_| DomainError::LifecycleTimeout {
                operation: operation.to_string(),
                waited_ms: self.wait_timeout.as_millis() as u64,
            })
    }
}
