//! End-to-end verification scenarios run in sequence against one environment.
//!
//! Each scenario builds on the state the previous one left behind, so the
//! order in [`Scenario::ALL`] matters. A failing scenario is recorded and the
//! runner moves on to the next.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

use crate::domain::errors::DomainError;
use crate::domain::models::{
    Direction, LifecycleConfig, Move, Observation, SearchOutcome, SearchParameters,
};
use crate::domain::ports::{ActionPort, ArcadeEnvironment};
use crate::services::search_controller::{observe_within, SearchController};
use crate::services::session_lifecycle::SessionLifecycle;
use crate::services::strategy_catalog::StrategyCatalog;

/// Upper bound on moves spent driving into a wall.
pub const DEFAULT_COLLISION_MOVE_LIMIT: u32 = 200;

/// The verification scenarios, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scenario {
    InitialState,
    Start,
    PauseResume,
    ScoreIncrease,
    HighScore,
    Reset,
    CollisionRestart,
}

impl Scenario {
    pub const ALL: [Self; 7] = [
        Self::InitialState,
        Self::Start,
        Self::PauseResume,
        Self::ScoreIncrease,
        Self::HighScore,
        Self::Reset,
        Self::CollisionRestart,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::InitialState => "initial-state",
            Self::Start => "start",
            Self::PauseResume => "pause-resume",
            Self::ScoreIncrease => "score-increase",
            Self::HighScore => "high-score",
            Self::Reset => "reset",
            Self::CollisionRestart => "collision-restart",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub name: String,
    pub passed: bool,
    pub detail: String,
    pub duration_ms: u64,
}

/// Aggregate of a full run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteReport {
    pub passed: usize,
    pub failed: usize,
    pub reports: Vec<ScenarioReport>,
}

impl SuiteReport {
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    fn push(&mut self, report: ScenarioReport) {
        if report.passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.reports.push(report);
    }
}

#[derive(Debug, thiserror::Error)]
enum ScenarioFailure {
    #[error("{0}")]
    Expectation(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

type ScenarioResult = Result<String, ScenarioFailure>;

fn expect(condition: bool, detail: impl FnOnce() -> String) -> Result<(), ScenarioFailure> {
    if condition {
        Ok(())
    } else {
        Err(ScenarioFailure::Expectation(detail()))
    }
}

/// Sequences [`Scenario`]s against one exclusively borrowed environment.
pub struct ScenarioRunner<'a, E: ?Sized> {
    env: &'a mut E,
    lifecycle_config: LifecycleConfig,
    catalog: StrategyCatalog,
    params: SearchParameters,
    collision_move_limit: u32,
}

impl<'a, E> ScenarioRunner<'a, E>
where
    E: ArcadeEnvironment + ?Sized,
{
    pub fn new(
        env: &'a mut E,
        lifecycle: LifecycleConfig,
        catalog: StrategyCatalog,
        params: SearchParameters,
    ) -> Self {
        Self {
            env,
            lifecycle_config: lifecycle,
            catalog,
            params,
            collision_move_limit: DEFAULT_COLLISION_MOVE_LIMIT,
        }
    }

    pub const fn with_collision_move_limit(mut self, limit: u32) -> Self {
        self.collision_move_limit = limit;
        self
    }

    /// Run every scenario in order.
    #[instrument(name = "scenarios", skip(self))]
    pub async fn run_all(&mut self) -> SuiteReport {
        self.run(&Scenario::ALL).await
    }

    /// Run the given scenarios in order.
    pub async fn run(&mut self, scenarios: &[Scenario]) -> SuiteReport {
        let mut suite = SuiteReport::default();
        for &scenario in scenarios {
            let report = self.run_one(scenario).await;
            suite.push(report);
        }
        info!(passed = suite.passed, failed = suite.failed, "scenario suite finished");
        suite
    }

    async fn run_one(&mut self, scenario: Scenario) -> ScenarioReport {
        let started = Instant::now();
        let result = match scenario {
            Scenario::InitialState => self.initial_state().await,
            Scenario::Start => self.start().await,
            Scenario::PauseResume => self.pause_resume().await,
            Scenario::ScoreIncrease => self.score_increase().await,
            Scenario::HighScore => self.high_score().await,
            Scenario::Reset => self.reset().await,
            Scenario::CollisionRestart => self.collision_restart().await,
        };
        let duration_ms = started.elapsed().as_millis() as u64;

        let (passed, detail) = match result {
            Ok(detail) => {
                info!(scenario = scenario.name(), duration_ms, "scenario passed");
                (true, detail)
            }
            Err(err) => {
                warn!(scenario = scenario.name(), error = %err, "scenario failed");
                (false, err.to_string())
            }
        };

        ScenarioReport {
            name: scenario.name().to_string(),
            passed,
            detail,
            duration_ms,
        }
    }

    fn lifecycle(&mut self) -> SessionLifecycle<'_, E> {
        SessionLifecycle::new(&mut *self.env, &self.lifecycle_config)
            .with_observe_timeout(self.params.observe_timeout)
    }

    async fn observe(&self) -> Observation {
        observe_within(&*self.env, self.params.observe_timeout).await
    }

    async fn initial_state(&mut self) -> ScenarioResult {
        let obs = self.lifecycle().reset().await?;
        expect(!obs.running, || "session still running after reset".to_string())?;
        expect(obs.score == 0, || format!("score {} after reset", obs.score))?;
        expect(obs.render_surface_valid, || {
            "render surface not available".to_string()
        })?;
        Ok("idle, score 0, render surface valid".to_string())
    }

    async fn start(&mut self) -> ScenarioResult {
        let obs = self.lifecycle().start().await?;
        expect(!obs.paused, || "session paused right after start".to_string())?;
        Ok("running".to_string())
    }

    async fn pause_resume(&mut self) -> ScenarioResult {
        let mut lifecycle = self.lifecycle();
        lifecycle.pause().await?;
        let obs = lifecycle.resume().await?;
        expect(obs.running, || "session not running after resume".to_string())?;
        Ok("pause label flipped both ways".to_string())
    }

    async fn score_increase(&mut self) -> ScenarioResult {
        let mut controller =
            SearchController::new(&mut *self.env, self.catalog.clone(), self.params.clone())?;
        let result = controller.seek().await?;
        expect(result.outcome == SearchOutcome::Succeeded, || {
            format!(
                "search ended {} after {} attempts",
                result.outcome, result.attempts
            )
        })?;
        Ok(format!(
            "score {} -> {} after {} attempts using {}",
            result.initial_score, result.final_score, result.attempts, result.strategy_used
        ))
    }

    async fn high_score(&mut self) -> ScenarioResult {
        let obs = self.observe().await;
        expect(obs.readings_valid, || "score displays unreadable".to_string())?;
        expect(obs.high_score >= obs.score, || {
            format!("high score {} below score {}", obs.high_score, obs.score)
        })?;
        Ok(format!("high score {} >= score {}", obs.high_score, obs.score))
    }

    async fn reset(&mut self) -> ScenarioResult {
        let obs = self.lifecycle().reset().await?;
        expect(!obs.running && obs.score == 0, || {
            format!("running={} score={} after reset", obs.running, obs.score)
        })?;
        Ok("idle, score 0".to_string())
    }

    async fn collision_restart(&mut self) -> ScenarioResult {
        self.lifecycle().start().await?;

        let settle = self.params.settle.max(Duration::from_millis(1));
        let mut moves = 0;
        while moves < self.collision_move_limit {
            self.env.act(Move::arrow(Direction::Up), settle).await?;
            moves += 1;
            if self.observe().await.terminated {
                break;
            }
        }
        expect(self.observe().await.terminated, || {
            format!("no collision within {} moves", self.collision_move_limit)
        })?;

        let obs = self.lifecycle().restart().await?;
        expect(!obs.terminated, || "still terminated after restart".to_string())?;
        Ok(format!("collided after {moves} moves, restarted"))
    }
}
