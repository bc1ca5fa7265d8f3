//! Scenario suite against scripted and simulated environments.

mod common;

use common::{fast_lifecycle, fast_params, setup_test_logging, small_grid};
use forage::adapters::{GridArcade, ScriptedEnvironment};
use forage::domain::models::LifecycleControl;
use forage::services::{Scenario, ScenarioRunner, StrategyCatalog};

#[tokio::test]
async fn test_full_suite_passes_on_cooperative_environment() {
    setup_test_logging();
    // score rises on the fourth search move; driving up collides at move 20
    let mut env = ScriptedEnvironment::idle()
        .with_score_increase_at(3)
        .with_stop_at(20);

    let suite = ScenarioRunner::new(
        &mut env,
        fast_lifecycle(),
        StrategyCatalog::reference().unwrap(),
        fast_params(50),
    )
    .run_all()
    .await;

    for report in &suite.reports {
        assert!(report.passed, "{} failed: {}", report.name, report.detail);
    }
    assert_eq!(suite.passed, 7);
    assert_eq!(suite.failed, 0);
    assert!(suite.all_passed());

    assert_eq!(
        env.controls(),
        &[
            LifecycleControl::Reset,
            LifecycleControl::Start,
            LifecycleControl::PauseToggle,
            LifecycleControl::PauseToggle,
            LifecycleControl::Reset,
            LifecycleControl::Start,
            LifecycleControl::Restart,
        ]
    );
}

#[tokio::test]
async fn test_reports_keep_execution_order() {
    let mut env = ScriptedEnvironment::idle()
        .with_score_increase_at(0)
        .with_stop_at(5);

    let suite = ScenarioRunner::new(
        &mut env,
        fast_lifecycle(),
        StrategyCatalog::reference().unwrap(),
        fast_params(10),
    )
    .run_all()
    .await;

    let names: Vec<_> = suite.reports.iter().map(|r| r.name.as_str()).collect();
    let expected: Vec<_> = Scenario::ALL.iter().map(|s| s.name()).collect();
    assert_eq!(names, expected);
}

#[tokio::test]
async fn test_lifecycle_scenarios_on_simulator() {
    let mut game = GridArcade::new(&small_grid(5)).unwrap();

    let suite = ScenarioRunner::new(
        &mut game,
        fast_lifecycle(),
        StrategyCatalog::reference().unwrap(),
        fast_params(30),
    )
    .run(&[
        Scenario::InitialState,
        Scenario::Start,
        Scenario::PauseResume,
        Scenario::HighScore,
        Scenario::Reset,
        Scenario::CollisionRestart,
    ])
    .await;

    for report in &suite.reports {
        assert!(report.passed, "{} failed: {}", report.name, report.detail);
    }
    let collision = suite.reports.last().unwrap();
    assert!(collision.detail.starts_with("collided after"));
}

#[tokio::test]
async fn test_failed_lifecycle_wait_is_reported_with_detail() {
    // already terminated: Start is ignored, so the start scenario times out
    let mut env = ScriptedEnvironment::running(0).with_stop_at(0);
    forage::ActionPort::dispatch(
        &mut env,
        forage::Move::arrow(forage::Direction::Left),
    )
    .await
    .unwrap();

    let suite = ScenarioRunner::new(
        &mut env,
        fast_lifecycle(),
        StrategyCatalog::reference().unwrap(),
        fast_params(10),
    )
    .run(&[Scenario::Start])
    .await;

    assert_eq!(suite.failed, 1);
    assert!(suite.reports[0].detail.contains("start"));
}
