//! Search session bookkeeping and results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};

/// Terminal (or pending) state of one search invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchOutcome {
    Pending,
    /// A score increase was observed within budget.
    Succeeded,
    /// The full budget was spent without a score increase.
    Exhausted,
    /// The loop gave up early because the environment stopped.
    EnvironmentStopped,
}

impl SearchOutcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Succeeded => "succeeded",
            Self::Exhausted => "exhausted",
            Self::EnvironmentStopped => "environment_stopped",
        }
    }

    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tunables for one controller instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParameters {
    /// Maximum number of attempts
    pub budget: u32,
    /// Attempts between strategy rotations
    pub rotation_period: u32,
    /// Wait after each dispatched move before observing
    pub settle: Duration,
    /// Attempts between checks of the running flag
    pub stop_check_interval: u32,
    /// Keep spending budget after the environment is seen stopped
    pub continue_on_stop: bool,
    /// Upper bound on a single observation poll
    pub observe_timeout: Duration,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            budget: 200,
            rotation_period: 15,
            settle: Duration::from_millis(100),
            stop_check_interval: 10,
            continue_on_stop: true,
            observe_timeout: Duration::from_millis(2000),
        }
    }
}

impl SearchParameters {
    pub fn validate(&self) -> DomainResult<()> {
        if self.budget == 0 {
            return Err(DomainError::InvalidParameters(
                "budget must be at least 1".to_string(),
            ));
        }
        if self.rotation_period == 0 {
            return Err(DomainError::InvalidParameters(
                "rotation_period must be at least 1".to_string(),
            ));
        }
        if self.stop_check_interval == 0 {
            return Err(DomainError::InvalidParameters(
                "stop_check_interval must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Transient state owned by exactly one controller invocation.
#[derive(Debug, Clone)]
pub struct SearchSession {
    pub id: Uuid,
    pub initial_score: u64,
    pub attempts: u32,
    pub strategy_index: usize,
    pub budget: u32,
    pub stopped_at: Option<u32>,
    /// Polls whose readings were unusable and skipped
    pub degraded_polls: u32,
    outcome: SearchOutcome,
    pub started_at: DateTime<Utc>,
}

impl SearchSession {
    pub fn new(initial_score: u64, budget: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            initial_score,
            attempts: 0,
            strategy_index: 0,
            budget,
            stopped_at: None,
            degraded_polls: 0,
            outcome: SearchOutcome::Pending,
            started_at: Utc::now(),
        }
    }

    pub const fn outcome(&self) -> SearchOutcome {
        self.outcome
    }

    /// Set the terminal outcome. Later calls are ignored.
    pub fn conclude(&mut self, outcome: SearchOutcome) {
        if !self.outcome.is_terminal() {
            self.outcome = outcome;
        }
    }

    /// Record the first attempt at which the environment was seen stopped.
    pub fn record_stop(&mut self, attempt: u32) {
        self.stopped_at.get_or_insert(attempt);
    }

    /// Outcome for a loop that ended without success.
    pub const fn unsuccessful_outcome(&self) -> SearchOutcome {
        if self.attempts >= self.budget {
            SearchOutcome::Exhausted
        } else {
            SearchOutcome::EnvironmentStopped
        }
    }
}

/// What the controller hands back to the verification layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub session_id: Uuid,
    pub succeeded: bool,
    pub outcome: SearchOutcome,
    pub initial_score: u64,
    pub final_score: u64,
    pub attempts: u32,
    pub budget: u32,
    pub strategy_used: String,
    pub stopped_at: Option<u32>,
    pub degraded_polls: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SearchResult {
    pub fn from_session(session: &SearchSession, final_score: u64, strategy_used: &str) -> Self {
        let outcome = session.outcome();
        Self {
            session_id: session.id,
            succeeded: outcome == SearchOutcome::Succeeded,
            outcome,
            initial_score: session.initial_score,
            final_score,
            attempts: session.attempts,
            budget: session.budget,
            strategy_used: strategy_used.to_string(),
            stopped_at: session.stopped_at,
            degraded_polls: session.degraded_polls,
            started_at: session.started_at,
            finished_at: Utc::now(),
        }
    }

    pub fn score_delta(&self) -> i128 {
        i128::from(self.final_score) - i128::from(self.initial_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_is_write_once() {
        let mut session = SearchSession::new(0, 10);
        session.conclude(SearchOutcome::Succeeded);
        session.conclude(SearchOutcome::Exhausted);
        assert_eq!(session.outcome(), SearchOutcome::Succeeded);
    }

    #[test]
    fn test_first_stop_is_kept() {
        let mut session = SearchSession::new(0, 50);
        session.record_stop(9);
        session.record_stop(19);
        assert_eq!(session.stopped_at, Some(9));
    }

    #[test]
    fn test_unsuccessful_outcome_depends_on_budget() {
        let mut session = SearchSession::new(0, 10);
        session.attempts = 10;
        assert_eq!(session.unsuccessful_outcome(), SearchOutcome::Exhausted);
        session.attempts = 4;
        assert_eq!(session.unsuccessful_outcome(), SearchOutcome::EnvironmentStopped);
    }

    #[test]
    fn test_parameters_reject_zero_budget() {
        let params = SearchParameters {
            budget: 0,
            ..Default::default()
        };
        assert!(matches!(params.validate(), Err(DomainError::InvalidParameters(_))));
    }

    #[test]
    fn test_default_parameters_are_valid() {
        assert!(SearchParameters::default().validate().is_ok());
    }
}
