//! Scripted environment for testing.
//!
//! A deterministic double whose score rise, stop and transport failure are
//! pinned to specific attempt indices. Every dispatched move and pressed
//! control is recorded for later assertions.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{LifecycleControl, Move, Observation};
use crate::domain::ports::{ActionPort, ControlPort, ObservationPort};

/// Points added when the scripted score rise fires.
pub const SCRIPTED_POINTS: u64 = 10;

/// Scripted environment for testing.
#[derive(Debug)]
pub struct ScriptedEnvironment {
    state: Observation,
    dispatched: u32,
    score_increase_at: Option<u32>,
    stop_at: Option<u32>,
    dispatch_failure_at: Option<u32>,
    unreadable_after: Option<u32>,
    ignore_controls: bool,
    observe_delay: Duration,
    slow_polls: u32,
    polls: AtomicU32,
    unreadable_pending: AtomicBool,
    moves: Vec<Move>,
    controls: Vec<LifecycleControl>,
}

impl ScriptedEnvironment {
    /// An idle session: not running, score 0, valid surface.
    pub fn idle() -> Self {
        Self {
            state: Observation {
                render_surface_valid: true,
                readings_valid: true,
                ..Observation::default()
            },
            dispatched: 0,
            score_increase_at: None,
            stop_at: None,
            dispatch_failure_at: None,
            unreadable_after: None,
            ignore_controls: false,
            observe_delay: Duration::ZERO,
            slow_polls: 0,
            polls: AtomicU32::new(0),
            unreadable_pending: AtomicBool::new(false),
            moves: Vec::new(),
            controls: Vec::new(),
        }
    }

    /// A session already running with the given score.
    pub fn running(score: u64) -> Self {
        let mut env = Self::idle();
        env.state.running = true;
        env.state.score = score;
        env.state.high_score = score;
        env
    }

    /// Raise the score right after the move with this 0-based index.
    pub const fn with_score_increase_at(mut self, attempt: u32) -> Self {
        self.score_increase_at = Some(attempt);
        self
    }

    /// Terminate the session right after the move with this 0-based index.
    pub const fn with_stop_at(mut self, attempt: u32) -> Self {
        self.stop_at = Some(attempt);
        self
    }

    /// Fail the dispatch of the move with this 0-based index.
    pub const fn with_dispatch_failure_at(mut self, attempt: u32) -> Self {
        self.dispatch_failure_at = Some(attempt);
        self
    }

    /// Report a missing rendering surface on every poll.
    pub const fn with_invalid_surface(mut self) -> Self {
        self.state.render_surface_valid = false;
        self
    }

    /// Delay every observation by `delay`.
    pub const fn with_observe_delay(mut self, delay: Duration) -> Self {
        self.observe_delay = delay;
        self.slow_polls = u32::MAX;
        self
    }

    /// Delay only the first `count` observations by `delay`.
    pub const fn with_slow_polls(mut self, count: u32, delay: Duration) -> Self {
        self.observe_delay = delay;
        self.slow_polls = count;
        self
    }

    /// Make the first poll after the move with this 0-based index unreadable.
    pub const fn with_unreadable_poll_after(mut self, attempt: u32) -> Self {
        self.unreadable_after = Some(attempt);
        self
    }

    /// Record pressed controls without reacting to them.
    pub const fn ignoring_controls(mut self) -> Self {
        self.ignore_controls = true;
        self
    }

    /// Moves dispatched so far, in order.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Controls pressed so far, in order.
    pub fn controls(&self) -> &[LifecycleControl] {
        &self.controls
    }

    pub const fn dispatched(&self) -> u32 {
        self.dispatched
    }

    fn bump_score(&mut self, points: u64) {
        self.state.score += points;
        self.state.high_score = self.state.high_score.max(self.state.score);
    }
}

impl Default for ScriptedEnvironment {
    fn default() -> Self {
        Self::idle()
    }
}

#[async_trait]
impl ObservationPort for ScriptedEnvironment {
    async fn observe(&self) -> Observation {
        let poll = self.polls.fetch_add(1, Ordering::SeqCst);
        if poll < self.slow_polls && !self.observe_delay.is_zero() {
            tokio::time::sleep(self.observe_delay).await;
        }
        if self.unreadable_pending.swap(false, Ordering::SeqCst) {
            return Observation::unavailable();
        }
        self.state
    }
}

#[async_trait]
impl ActionPort for ScriptedEnvironment {
    async fn dispatch(&mut self, mv: Move) -> DomainResult<()> {
        let index = self.dispatched;
        if self.dispatch_failure_at == Some(index) {
            return Err(DomainError::Transport(format!(
                "scripted dispatch failure at move {index}"
            )));
        }

        self.dispatched += 1;
        self.moves.push(mv);
        if self.unreadable_after == Some(index) {
            self.unreadable_pending.store(true, Ordering::SeqCst);
        }

        if self.state.terminated || !self.state.running || self.state.paused {
            return Ok(());
        }
        if self.score_increase_at == Some(index) {
            self.bump_score(SCRIPTED_POINTS);
        }
        if self.stop_at == Some(index) {
            self.state.running = false;
            self.state.terminated = true;
        }
        Ok(())
    }
}

#[async_trait]
impl ControlPort for ScriptedEnvironment {
    async fn press(&mut self, control: LifecycleControl) -> DomainResult<()> {
        self.controls.push(control);
        if self.ignore_controls {
            return Ok(());
        }
        match control {
            LifecycleControl::Start => {
                if !self.state.terminated {
                    self.state.running = true;
                }
            }
            LifecycleControl::PauseToggle => {
                if self.state.running {
                    self.state.paused = !self.state.paused;
                }
            }
            LifecycleControl::Reset => {
                self.state.running = false;
                self.state.paused = false;
                self.state.terminated = false;
                self.state.score = 0;
            }
            LifecycleControl::Restart => {
                self.state.running = true;
                self.state.paused = false;
                self.state.terminated = false;
                self.state.score = 0;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Direction;

    #[tokio::test]
    async fn test_score_rises_after_scheduled_move() {
        let mut env = ScriptedEnvironment::running(0).with_score_increase_at(1);

        env.dispatch(Move::arrow(Direction::Up)).await.unwrap();
        assert_eq!(env.observe().await.score, 0);

        env.dispatch(Move::arrow(Direction::Up)).await.unwrap();
        let obs = env.observe().await;
        assert_eq!(obs.score, SCRIPTED_POINTS);
        assert_eq!(obs.high_score, SCRIPTED_POINTS);
    }

    #[tokio::test]
    async fn test_stop_never_recovers() {
        let mut env = ScriptedEnvironment::running(0)
            .with_stop_at(0)
            .with_score_increase_at(3);

        for _ in 0..6 {
            env.dispatch(Move::arrow(Direction::Left)).await.unwrap();
        }

        let obs = env.observe().await;
        assert!(obs.terminated);
        assert!(!obs.running);
        assert_eq!(obs.score, 0);
        assert_eq!(env.moves().len(), 6);
    }

    #[tokio::test]
    async fn test_reset_clears_score_and_running() {
        let mut env = ScriptedEnvironment::running(40);
        env.press(LifecycleControl::Reset).await.unwrap();

        let obs = env.observe().await;
        assert!(!obs.running);
        assert_eq!(obs.score, 0);
        assert_eq!(obs.high_score, 40);
        assert_eq!(env.controls(), &[LifecycleControl::Reset]);
    }

    #[tokio::test]
    async fn test_pause_toggle_only_when_running() {
        let mut env = ScriptedEnvironment::idle();
        env.press(LifecycleControl::PauseToggle).await.unwrap();
        assert!(!env.observe().await.paused);

        env.press(LifecycleControl::Start).await.unwrap();
        env.press(LifecycleControl::PauseToggle).await.unwrap();
        assert!(env.observe().await.paused);
    }

    #[tokio::test]
    async fn test_unreadable_poll_fires_once() {
        let mut env = ScriptedEnvironment::running(40).with_unreadable_poll_after(0);
        env.dispatch(Move::arrow(Direction::Up)).await.unwrap();

        assert_eq!(env.observe().await, Observation::unavailable());
        let obs = env.observe().await;
        assert!(obs.readings_valid);
        assert_eq!(obs.score, 40);
    }

    #[tokio::test]
    async fn test_ignoring_controls_records_but_keeps_state() {
        let mut env = ScriptedEnvironment::running(40).ignoring_controls();
        env.press(LifecycleControl::Reset).await.unwrap();

        let obs = env.observe().await;
        assert!(obs.running);
        assert_eq!(obs.score, 40);
        assert_eq!(env.controls(), &[LifecycleControl::Reset]);
    }

    #[tokio::test]
    async fn test_only_first_polls_are_slow() {
        let env = ScriptedEnvironment::running(1).with_slow_polls(1, Duration::from_millis(50));

        let start = tokio::time::Instant::now();
        env.observe().await;
        assert!(start.elapsed() >= Duration::from_millis(50));

        let second = tokio::time::Instant::now();
        env.observe().await;
        assert!(second.elapsed() < Duration::from_millis(50));
    }
}
