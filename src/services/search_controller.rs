//! SearchController - blind goal seeking against an opaque environment
//!
//! Drives the environment with replayed strategy patterns until the observed
//! score rises above its value at invocation start, the attempt budget runs
//! out, or (when configured) the environment is seen stopped.
//!
//! The controller never starts, pauses or resets the session; it assumes the
//! environment is running and unpaused on entry.
//!
//! Polls whose readings are unusable (`readings_valid == false`) never count
//! as a score rise or a stop. The baseline itself must come from a readable
//! poll.

use std::time::Duration;
use tracing::{debug, info, instrument, warn, Span};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Observation, SearchOutcome, SearchParameters, SearchResult, SearchSession};
use crate::domain::ports::{ActionPort, ObservationPort};
use crate::services::strategy_catalog::StrategyCatalog;

/// Observe, substituting a degraded snapshot if the poll exceeds `limit`.
pub async fn observe_within<E>(env: &E, limit: Duration) -> Observation
where
    E: ObservationPort + ?Sized,
{
    match tokio::time::timeout(limit, env.observe()).await {
        Ok(obs) => obs,
        Err(_) => {
            warn!(timeout_ms = limit.as_millis() as u64, "observation timed out");
            Observation::unavailable()
        }
    }
}

/// Readable polls tried before a search gives up on its baseline.
pub const BASELINE_POLLS: u32 = 5;

/// Goal-seeking controller bound to one exclusively borrowed environment.
pub struct SearchController<'a, E: ?Sized> {
    env: &'a mut E,
    catalog: StrategyCatalog,
    params: SearchParameters,
}

impl<'a, E> SearchController<'a, E>
where
    E: ObservationPort + ActionPort + ?Sized,
{
    /// Create a controller. Fails if the parameters are unusable.
    pub fn new(
        env: &'a mut E,
        catalog: StrategyCatalog,
        params: SearchParameters,
    ) -> DomainResult<Self> {
        params.validate()?;
        Ok(Self {
            env,
            catalog,
            params,
        })
    }

    pub const fn parameters(&self) -> &SearchParameters {
        &self.params
    }

    pub const fn catalog(&self) -> &StrategyCatalog {
        &self.catalog
    }

    /// Run one search session to a terminal outcome.
    ///
    /// Budget exhaustion and a stopped environment are returned as outcomes.
    /// Transport faults from the action port and an unreadable baseline are
    /// errors.
    #[instrument(
        name = "search",
        skip(self),
        fields(
            session_id = tracing::field::Empty,
            budget = self.params.budget,
            strategies = self.catalog.len()
        )
    )]
    pub async fn seek(&mut self) -> DomainResult<SearchResult> {
        let params = self.params.clone();

        let initial = self.baseline().await?;
        let mut session = SearchSession::new(initial.score, params.budget);
        Span::current().record("session_id", tracing::field::display(session.id));

        if !initial.render_surface_valid {
            warn!("render surface unavailable at search start");
        }
        debug!(
            initial_score = initial.score,
            running = initial.running,
            "search started"
        );

        let mut last = initial;
        let mut surface_warned = !initial.render_surface_valid;

        for attempt in 0..params.budget {
            if attempt > 0 && attempt % params.rotation_period == 0 {
                session.strategy_index = (session.strategy_index + 1) % self.catalog.len();
                debug!(
                    attempt,
                    strategy = self.strategy_name(session.strategy_index),
                    "rotating strategy"
                );
            }

            let mv = self.catalog.next_move(session.strategy_index, attempt);
            self.env.act(mv, params.settle).await?;

            let obs = observe_within(&*self.env, params.observe_timeout).await;
            if !obs.readings_valid {
                if session.degraded_polls == 0 {
                    warn!(attempt, "observation unreadable, skipping goal and stop checks");
                }
                session.degraded_polls += 1;
                session.attempts += 1;
                continue;
            }
            last = obs;

            if !obs.render_surface_valid && !surface_warned {
                warn!(attempt, "render surface unavailable, continuing on degraded observations");
                surface_warned = true;
            }

            // Success is checked first, so a rise seen together with a stop wins.
            if obs.score > session.initial_score {
                session.conclude(SearchOutcome::Succeeded);
                break;
            }

            if (attempt + 1) % params.stop_check_interval == 0 && obs.is_stopped() {
                if session.stopped_at.is_none() {
                    warn!(
                        attempt,
                        terminated = obs.terminated,
                        continue_on_stop = params.continue_on_stop,
                        "environment stopped mid-search"
                    );
                }
                session.record_stop(attempt);

                if !params.continue_on_stop {
                    session.attempts += 1;
                    break;
                }
            }

            session.attempts += 1;
        }

        if !session.outcome().is_terminal() {
            let outcome = session.unsuccessful_outcome();
            session.conclude(outcome);
        }

        let result = SearchResult::from_session(
            &session,
            last.score,
            self.strategy_name(session.strategy_index),
        );

        info!(
            outcome = %result.outcome,
            attempts = result.attempts,
            initial_score = result.initial_score,
            final_score = result.final_score,
            degraded_polls = result.degraded_polls,
            strategy = %result.strategy_used,
            "search finished"
        );

        Ok(result)
    }

    /// First readable observation, retried up to [`BASELINE_POLLS`] times.
    async fn baseline(&self) -> DomainResult<Observation> {
        for poll in 1..=BASELINE_POLLS {
            let obs = observe_within(&*self.env, self.params.observe_timeout).await;
            if obs.readings_valid {
                return Ok(obs);
            }
            debug!(poll, "baseline observation unreadable");
            if poll < BASELINE_POLLS {
                tokio::time::sleep(self.params.settle).await;
            }
        }
        Err(DomainError::BaselineUnavailable {
            polls: BASELINE_POLLS,
        })
    }

    fn strategy_name(&self, index: usize) -> &'static str {
        self.catalog.get(index).map_or("unknown", |s| s.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::scripted::ScriptedEnvironment;

    fn params(budget: u32) -> SearchParameters {
        SearchParameters {
            budget,
            settle: Duration::ZERO,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_rejects_zero_rotation_period() {
        let mut env = ScriptedEnvironment::running(0);
        let bad = SearchParameters {
            rotation_period: 0,
            ..params(10)
        };
        let result = SearchController::new(&mut env, StrategyCatalog::reference().unwrap(), bad);
        assert!(matches!(result, Err(DomainError::InvalidParameters(_))));
    }

    #[tokio::test]
    async fn test_immediate_success_on_first_attempt() {
        let mut env = ScriptedEnvironment::running(5).with_score_increase_at(0);
        let mut controller =
            SearchController::new(&mut env, StrategyCatalog::reference().unwrap(), params(20))
                .unwrap();

        let result = controller.seek().await.unwrap();

        assert!(result.succeeded);
        assert_eq!(result.attempts, 0);
        assert_eq!(result.initial_score, 5);
        assert!(result.final_score > 5);
        assert_eq!(result.strategy_used, "spiral");
    }

    #[tokio::test]
    async fn test_success_reports_active_strategy() {
        let mut env = ScriptedEnvironment::running(0).with_score_increase_at(31);
        let mut controller =
            SearchController::new(&mut env, StrategyCatalog::reference().unwrap(), params(200))
                .unwrap();

        let result = controller.seek().await.unwrap();

        assert_eq!(result.attempts, 31);
        assert_eq!(result.strategy_used, "random-biased");
    }

    #[tokio::test]
    async fn test_transport_fault_propagates() {
        let mut env = ScriptedEnvironment::running(0).with_dispatch_failure_at(3);
        let mut controller =
            SearchController::new(&mut env, StrategyCatalog::reference().unwrap(), params(20))
                .unwrap();

        let err = controller.seek().await.unwrap_err();
        assert!(matches!(err, DomainError::Transport(_)));
    }

    #[tokio::test]
    async fn test_unreadable_baseline_is_an_error() {
        let mut env = ScriptedEnvironment::running(40).with_observe_delay(Duration::from_millis(100));
        let quick = SearchParameters {
            observe_timeout: Duration::from_millis(5),
            ..params(10)
        };
        let mut controller =
            SearchController::new(&mut env, StrategyCatalog::reference().unwrap(), quick).unwrap();

        let err = controller.seek().await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::BaselineUnavailable { polls: BASELINE_POLLS }
        ));
        assert_eq!(env.dispatched(), 0);
    }

    #[tokio::test]
    async fn test_observe_within_degrades_on_timeout() {
        let env = ScriptedEnvironment::running(3).with_observe_delay(Duration::from_millis(200));
        let obs = observe_within(&env, Duration::from_millis(10)).await;
        assert_eq!(obs, Observation::unavailable());
    }
}
